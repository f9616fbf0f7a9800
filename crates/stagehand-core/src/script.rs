//! Scripted capture sessions
//!
//! A script is a JSON array of timed capture inputs. Running it mounts a
//! controller backed by the real scroller, tween engine and page state, feeds
//! every input at its timestamp and reports what the controller did. Pending
//! releases fire at their deadline, between steps and after the last one.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::{CaptureController, CaptureInput, CaptureSnapshot, Outcome};
use crate::config::{CaptureConfig, SmoothScrollConfig};
use crate::error::{Error, Result};
use crate::motion::TweenEngine;
use crate::platform::{PageState, PanelId, PanelPair};
use crate::smooth::SmoothScroll;

const LEADING: PanelId = PanelId(0);
const TRAILING: PanelId = PanelId(1);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Milliseconds since the controller was mounted
    pub at_ms: u64,
    pub event: CaptureInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    /// Parse and validate a script. Timestamps must not go backwards.
    pub fn from_json(content: &str) -> Result<Self> {
        let steps: Vec<ScriptStep> = serde_json::from_str(content)?;
        Self::new(steps)
    }

    pub fn new(steps: Vec<ScriptStep>) -> Result<Self> {
        for (index, pair) in steps.windows(2).enumerate() {
            if pair[1].at_ms < pair[0].at_ms {
                return Err(Error::Script {
                    step: index + 1,
                    message: format!(
                        "at_ms {} is earlier than the previous step ({})",
                        pair[1].at_ms, pair[0].at_ms
                    ),
                });
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }
}

/// Panel positions as the animator shows them at the report time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelPositions {
    pub leading: f64,
    pub trailing: f64,
}

/// What happened at one point of the session
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub at_ms: u64,
    /// The scripted input, or None for mount and fired releases
    pub input: Option<CaptureInput>,
    pub effects: Vec<String>,
    pub prevent_default: bool,
    pub snapshot: CaptureSnapshot,
    pub panels: PanelPositions,
    pub page_blocked: bool,
}

type ScriptController = CaptureController<Rc<RefCell<SmoothScroll>>, TweenEngine<PanelId>, PageState>;

/// Replays scripts against a freshly mounted controller
pub struct Simulator {
    controller: ScriptController,
    base: Instant,
}

impl Simulator {
    pub fn new(capture: CaptureConfig, smooth_scroll: SmoothScrollConfig) -> Self {
        let scroll = Rc::new(RefCell::new(SmoothScroll::new(smooth_scroll)));
        Self {
            controller: CaptureController::new(capture, scroll, TweenEngine::new(), PageState::new()),
            base: Instant::now(),
        }
    }

    fn at(&self, at_ms: u64) -> Instant {
        self.base + Duration::from_millis(at_ms)
    }

    fn millis_since_base(&self, instant: Instant) -> u64 {
        u64::try_from(instant.saturating_duration_since(self.base).as_millis()).unwrap_or(u64::MAX)
    }

    fn report(&mut self, at_ms: u64, input: Option<CaptureInput>, outcome: Outcome) -> StepReport {
        let now = self.at(at_ms);
        let animator = self.controller.animator_mut();
        animator.update(now);
        let panels = PanelPositions {
            leading: animator.sample(LEADING, now),
            trailing: animator.sample(TRAILING, now),
        };
        StepReport {
            at_ms,
            input,
            effects: outcome.effects.iter().map(ToString::to_string).collect(),
            prevent_default: outcome.prevent_default,
            snapshot: self.controller.snapshot(),
            panels,
            page_blocked: self.controller.host().is_scroll_blocked(),
        }
    }

    /// Fire a release that falls due at or before `limit_ms`
    fn fire_due(&mut self, limit_ms: Option<u64>) -> Option<StepReport> {
        let deadline = self.controller.next_deadline()?;
        let at_ms = self.millis_since_base(deadline);
        if limit_ms.is_some_and(|limit| at_ms > limit) {
            return None;
        }
        let outcome = self.controller.poll(deadline);
        Some(self.report(at_ms, None, outcome))
    }

    /// Mount with `viewport_width`, replay `script`, then let any pending
    /// release fire
    pub fn run(mut self, script: &Script, viewport_width: f64) -> Vec<StepReport> {
        let mut reports = Vec::with_capacity(script.steps().len() + 2);

        let panels = PanelPair {
            leading: LEADING,
            trailing: TRAILING,
        };
        let outcome = self.controller.start(Some(panels), Some(viewport_width), self.base);
        reports.push(self.report(0, None, outcome));

        for step in script.steps() {
            if let Some(report) = self.fire_due(Some(step.at_ms)) {
                reports.push(report);
            }
            let now = self.at(step.at_ms);
            let outcome = self.controller.dispatch(step.event, now);
            debug!(at_ms = step.at_ms, effects = outcome.effects.len(), "script step");
            reports.push(self.report(step.at_ms, Some(step.event), outcome));
        }

        if let Some(report) = self.fire_due(None) {
            reports.push(report);
        }
        reports
    }
}
