//! Capture/progress state machine
//!
//! Pure logic: every handler takes the current state plus one input and
//! returns the side effects the host must perform. Nothing here touches a
//! page, a tween engine or a clock.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use super::input::{TouchTracker, WheelDelta};
use super::progress::{move_distance, PanelOffsets, Progress};
use crate::config::CaptureConfig;
use crate::platform::{PanelId, PanelPair, PanelTween};
use crate::visibility::IntersectionEntry;

/// Whether the section currently owns scroll input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Page scrolls normally
    #[default]
    Idle,
    /// Section owns wheel and touch input
    Captured {
        /// Set once a boundary was pushed past; capture ends at this instant
        release_at: Option<Instant>,
    },
}

impl CaptureState {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, CaptureState::Captured { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Captured { release_at: None } => "captured",
            CaptureState::Captured { release_at: Some(_) } => "releasing",
        }
    }
}

/// A side effect requested by the machine, in execution order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    PauseSmoothScroll,
    BlockPageScroll,
    AttachListeners,
    AnimatePanel { panel: PanelId, tween: PanelTween },
    PlacePanel { panel: PanelId, offset: f64 },
    UnblockPageScroll,
    DetachListeners,
    ResumeSmoothScroll,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::PauseSmoothScroll => f.write_str("pause_smooth_scroll"),
            Effect::BlockPageScroll => f.write_str("block_page_scroll"),
            Effect::AttachListeners => f.write_str("attach_listeners"),
            Effect::AnimatePanel { panel, tween } => write!(
                f,
                "animate {} -> {:.1} over {}ms",
                panel,
                tween.target,
                tween.duration.as_millis()
            ),
            Effect::PlacePanel { panel, offset } => write!(f, "place {} at {:.1}", panel, offset),
            Effect::UnblockPageScroll => f.write_str("unblock_page_scroll"),
            Effect::DetachListeners => f.write_str("detach_listeners"),
            Effect::ResumeSmoothScroll => f.write_str("resume_smooth_scroll"),
        }
    }
}

/// Result of feeding one input to the machine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub effects: Vec<Effect>,
    /// The host must suppress the browser's default scroll for this input
    pub prevent_default: bool,
}

impl Outcome {
    fn prevented() -> Self {
        Self {
            effects: Vec::new(),
            prevent_default: true,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && !self.prevent_default
    }
}

/// Serializable view of the machine for status lines and scripts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaptureSnapshot {
    pub state: &'static str,
    pub progress: Progress,
    pub move_distance: f64,
    pub offsets: PanelOffsets,
}

/// Capture state machine for one pinned section
#[derive(Debug, Clone)]
pub struct CaptureMachine {
    config: CaptureConfig,
    /// None until mounted, and again after unmount
    panels: Option<PanelPair>,
    state: CaptureState,
    progress: Progress,
    move_distance: f64,
    touch: TouchTracker,
}

impl CaptureMachine {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            panels: None,
            state: CaptureState::Idle,
            progress: Progress::START,
            move_distance: 0.0,
            touch: TouchTracker::new(),
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> CaptureState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    #[inline]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[inline]
    pub fn move_distance(&self) -> f64 {
        self.move_distance
    }

    #[inline]
    pub fn panels(&self) -> Option<PanelPair> {
        self.panels
    }

    pub fn offsets(&self) -> PanelOffsets {
        PanelOffsets::at(self.progress, self.move_distance)
    }

    /// When the pending release fires, if one is scheduled
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            CaptureState::Captured { release_at } => release_at,
            CaptureState::Idle => None,
        }
    }

    pub fn snapshot(&self) -> CaptureSnapshot {
        CaptureSnapshot {
            state: self.state.label(),
            progress: self.progress,
            move_distance: self.move_distance,
            offsets: self.offsets(),
        }
    }

    /// Attach to the page. Without panels every later input is a no-op.
    pub fn mount(&mut self, panels: Option<PanelPair>, viewport_width: Option<f64>) -> Outcome {
        self.panels = panels;
        self.move_distance = move_distance(viewport_width, self.config.move_distance_factor);

        let Some(panels) = panels else {
            debug!("card stack mounted without panels; capture disabled");
            return Outcome::default();
        };

        let offsets = self.offsets();
        Outcome {
            effects: vec![
                Effect::PlacePanel {
                    panel: panels.leading,
                    offset: offsets.leading,
                },
                Effect::PlacePanel {
                    panel: panels.trailing,
                    offset: offsets.trailing,
                },
            ],
            prevent_default: false,
        }
    }

    /// Detach from the page, releasing capture whatever the progress
    pub fn unmount(&mut self) -> Outcome {
        let mut outcome = Outcome::default();
        if self.is_active() {
            debug!(progress = self.progress.value(), "unmounting while captured");
            self.release_into(&mut outcome);
        }
        self.panels = None;
        outcome
    }

    /// Viewport visibility changed
    pub fn intersection(&mut self, entry: IntersectionEntry) -> Outcome {
        if self.panels.is_none() || self.is_active() {
            return Outcome::default();
        }
        if !entry.is_intersecting || entry.ratio < self.config.activation_ratio {
            return Outcome::default();
        }

        self.state = CaptureState::Captured { release_at: None };
        self.touch.reset();
        debug!(ratio = entry.ratio, progress = self.progress.value(), "capture engaged");

        Outcome {
            effects: vec![
                Effect::PauseSmoothScroll,
                Effect::BlockPageScroll,
                Effect::AttachListeners,
            ],
            prevent_default: false,
        }
    }

    pub fn wheel(&mut self, wheel: WheelDelta, now: Instant) -> Outcome {
        let sensitivity = self.config.wheel_sensitivity;
        self.apply_delta(wheel.effective(), sensitivity, now)
    }

    pub fn touch_start(&mut self, y: f64) -> Outcome {
        if self.panels.is_none() || !self.is_active() {
            return Outcome::default();
        }
        self.touch.start(y);
        Outcome::default()
    }

    pub fn touch_move(&mut self, y: f64, now: Instant) -> Outcome {
        if self.panels.is_none() || !self.is_active() {
            return Outcome::default();
        }
        let delta = self.touch.move_to(y);
        let sensitivity = self.config.touch_sensitivity;
        self.apply_delta(delta, sensitivity, now)
    }

    /// Viewport width changed: rescale the panels, keep progress
    pub fn resize(&mut self, viewport_width: Option<f64>) -> Outcome {
        let Some(panels) = self.panels else {
            return Outcome::default();
        };
        self.move_distance = move_distance(viewport_width, self.config.move_distance_factor);
        let offsets = self.offsets();
        Outcome {
            effects: vec![
                Effect::PlacePanel {
                    panel: panels.leading,
                    offset: offsets.leading,
                },
                Effect::PlacePanel {
                    panel: panels.trailing,
                    offset: offsets.trailing,
                },
            ],
            prevent_default: false,
        }
    }

    /// Fire the pending release if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Outcome {
        let mut outcome = Outcome::default();
        if let CaptureState::Captured {
            release_at: Some(deadline),
        } = self.state
        {
            if now >= deadline {
                self.release_into(&mut outcome);
            }
        }
        outcome
    }

    /// Drop to idle without issuing release effects. The scroll block and
    /// capture listeners now belong to the section that took over, so the
    /// page is left exactly as the new holder set it up.
    pub fn evict(&mut self) {
        if self.is_active() {
            debug!("capture evicted by another section");
        }
        self.state = CaptureState::Idle;
        self.touch.reset();
    }

    fn apply_delta(&mut self, delta: f64, sensitivity: f64, now: Instant) -> Outcome {
        let Some(panels) = self.panels else {
            return Outcome::default();
        };
        if !self.is_active() {
            return Outcome::default();
        }

        let mut outcome = Outcome::prevented();
        if delta == 0.0 || !delta.is_finite() {
            return outcome;
        }

        let next = self.progress.advance(delta * sensitivity);
        let epsilon = self.config.boundary_epsilon;

        if next.value() >= 1.0 - epsilon && delta > 0.0 {
            self.progress = Progress::END;
            self.schedule_release(now);
        } else if next.value() <= epsilon && delta < 0.0 {
            self.progress = Progress::START;
            self.schedule_release(now);
        } else {
            self.progress = next;
            self.cancel_release();
        }

        let tween = |target: f64| PanelTween {
            target,
            duration: self.config.panel_tween_duration(),
            easing: self.config.panel_easing,
        };
        let offsets = self.offsets();
        outcome.effects.push(Effect::AnimatePanel {
            panel: panels.leading,
            tween: tween(offsets.leading),
        });
        outcome.effects.push(Effect::AnimatePanel {
            panel: panels.trailing,
            tween: tween(offsets.trailing),
        });

        if self.next_deadline().is_some_and(|deadline| deadline <= now) {
            self.release_into(&mut outcome);
        }

        outcome
    }

    /// Schedule (or push back) the release; the newest push wins
    fn schedule_release(&mut self, now: Instant) {
        let deadline = now + self.config.release_delay();
        if let CaptureState::Captured { release_at } = &mut self.state {
            if release_at.is_none() {
                debug!(progress = self.progress.value(), "boundary reached; release scheduled");
            }
            *release_at = Some(deadline);
        }
    }

    fn cancel_release(&mut self) {
        if let CaptureState::Captured { release_at } = &mut self.state {
            if release_at.take().is_some() {
                debug!(progress = self.progress.value(), "release interrupted");
            }
        }
    }

    fn release_into(&mut self, outcome: &mut Outcome) {
        if !self.is_active() {
            return;
        }
        self.state = CaptureState::Idle;
        self.touch.reset();
        debug!(progress = self.progress.value(), "capture released");
        outcome.effects.extend([
            Effect::UnblockPageScroll,
            Effect::DetachListeners,
            Effect::ResumeSmoothScroll,
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const PANELS: PanelPair = PanelPair {
        leading: PanelId(0),
        trailing: PanelId(1),
    };

    fn visible(ratio: f64) -> IntersectionEntry {
        IntersectionEntry {
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }

    fn captured_machine() -> CaptureMachine {
        let mut machine = CaptureMachine::new(CaptureConfig::default());
        machine.mount(Some(PANELS), Some(1000.0));
        machine.intersection(visible(1.0));
        assert!(machine.is_active());
        machine
    }

    fn animated_targets(outcome: &Outcome) -> Vec<(PanelId, f64)> {
        outcome
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::AnimatePanel { panel, tween } => Some((*panel, tween.target)),
                _ => None,
            })
            .collect()
    }

    fn releases(outcome: &Outcome) -> bool {
        outcome.effects.contains(&Effect::ResumeSmoothScroll)
    }

    #[test]
    fn test_mount_places_panels_at_rest() {
        let mut machine = CaptureMachine::new(CaptureConfig::default());
        let outcome = machine.mount(Some(PANELS), Some(1000.0));
        assert!((machine.move_distance() - 1200.0).abs() < 1e-9);
        assert_eq!(
            outcome.effects,
            vec![
                Effect::PlacePanel { panel: PanelId(0), offset: 0.0 },
                Effect::PlacePanel { panel: PanelId(1), offset: 0.0 },
            ]
        );
    }

    #[test]
    fn test_activation_needs_ninety_percent() {
        let mut machine = CaptureMachine::new(CaptureConfig::default());
        machine.mount(Some(PANELS), Some(1000.0));

        assert!(machine.intersection(visible(0.75)).is_empty());
        assert!(!machine.is_active());

        let outcome = machine.intersection(visible(0.9));
        assert_eq!(
            outcome.effects,
            vec![
                Effect::PauseSmoothScroll,
                Effect::BlockPageScroll,
                Effect::AttachListeners,
            ]
        );

        // Already captured: idempotent
        assert!(machine.intersection(visible(1.0)).is_empty());
    }

    #[test]
    fn test_idle_ignores_input() {
        let mut machine = CaptureMachine::new(CaptureConfig::default());
        machine.mount(Some(PANELS), Some(1000.0));
        let now = Instant::now();

        assert!(machine.wheel(WheelDelta::new(120.0), now).is_empty());
        assert!(machine.touch_start(400.0).is_empty());
        assert!(machine.touch_move(300.0, now).is_empty());
        assert_eq!(machine.progress(), Progress::START);
    }

    #[test]
    fn test_wheel_moves_progress_and_panels() {
        let mut machine = captured_machine();
        let outcome = machine.wheel(WheelDelta::new(125.0), Instant::now());

        assert!(outcome.prevent_default);
        assert!((machine.progress().value() - 0.25).abs() < 1e-9);
        let targets = animated_targets(&outcome);
        assert_eq!(targets.len(), 2);
        assert!((targets[0].1 + 600.0).abs() < 1e-6);
        assert_eq!(targets[1].1, 0.0);
    }

    #[test]
    fn test_progress_stays_clamped_for_any_sequence() {
        let mut machine = captured_machine();
        let start = Instant::now();
        let deltas = [
            900.0, -3000.0, 45.5, 1e6, -0.1, 250.0, -250.0, 77.0, -1e9, 0.0, 333.3, 600.0,
        ];
        for (i, delta) in deltas.iter().cycle().take(120).enumerate() {
            let now = start + Duration::from_millis(i as u64);
            // Re-engage whenever a release fired so input keeps flowing
            machine.poll(now);
            machine.intersection(visible(1.0));
            machine.wheel(WheelDelta::new(*delta), now);
            let p = machine.progress().value();
            assert!((0.0..=1.0).contains(&p), "progress {} out of range", p);
        }
    }

    #[test]
    fn test_monotonic_input_never_reverses_panels() {
        let mut machine = captured_machine();
        let now = Instant::now();
        let mut last = machine.offsets();
        for _ in 0..60 {
            machine.wheel(WheelDelta::new(13.0), now);
            let offsets = machine.offsets();
            assert!(offsets.leading <= last.leading);
            assert!(offsets.trailing >= last.trailing);
            last = offsets;
        }
        for _ in 0..60 {
            machine.wheel(WheelDelta::new(-13.0), now);
            let offsets = machine.offsets();
            assert!(offsets.leading >= last.leading);
            assert!(offsets.trailing <= last.trailing);
            last = offsets;
        }
    }

    #[test]
    fn test_push_past_end_releases_after_delay() {
        let mut machine = captured_machine();
        let start = Instant::now();

        let outcome = machine.wheel(WheelDelta::new(600.0), start);
        assert_eq!(machine.progress(), Progress::END);
        assert_eq!(animated_targets(&outcome), vec![(PanelId(0), -1200.0), (PanelId(1), 1200.0)]);
        assert_eq!(machine.next_deadline(), Some(start + Duration::from_millis(150)));
        assert!(!releases(&outcome));

        assert!(machine.poll(start + Duration::from_millis(149)).is_empty());
        assert!(machine.is_active());

        let released = machine.poll(start + Duration::from_millis(150));
        assert_eq!(
            released.effects,
            vec![
                Effect::UnblockPageScroll,
                Effect::DetachListeners,
                Effect::ResumeSmoothScroll,
            ]
        );
        assert!(!machine.is_active());
        assert_eq!(machine.progress(), Progress::END);
        // Only once
        assert!(machine.poll(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_push_past_start_releases() {
        let mut machine = captured_machine();
        let start = Instant::now();
        machine.wheel(WheelDelta::new(-10.0), start);
        assert_eq!(machine.progress(), Progress::START);
        assert!(machine.next_deadline().is_some());
        assert!(releases(&machine.poll(start + Duration::from_millis(150))));
    }

    #[test]
    fn test_reverse_before_deadline_cancels_release() {
        let mut machine = captured_machine();
        let start = Instant::now();
        machine.wheel(WheelDelta::new(600.0), start);
        assert!(machine.next_deadline().is_some());

        machine.wheel(WheelDelta::new(-20.0), start + Duration::from_millis(100));
        assert_eq!(machine.next_deadline(), None);
        assert!(machine.poll(start + Duration::from_millis(500)).is_empty());
        assert!(machine.is_active());
        assert!((machine.progress().value() - 0.96).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_push_resets_deadline() {
        let mut machine = captured_machine();
        let start = Instant::now();
        machine.wheel(WheelDelta::new(600.0), start);
        let later = start + Duration::from_millis(100);
        machine.wheel(WheelDelta::new(50.0), later);
        assert_eq!(machine.next_deadline(), Some(later + Duration::from_millis(150)));
        assert!(machine.poll(start + Duration::from_millis(200)).is_empty());
        assert!(releases(&machine.poll(later + Duration::from_millis(150))));
    }

    #[test]
    fn test_resize_rescales_without_touching_progress() {
        let mut machine = captured_machine();
        machine.wheel(WheelDelta::new(375.0), Instant::now());
        let progress = machine.progress();

        let outcome = machine.resize(Some(500.0));
        assert_eq!(machine.progress(), progress);
        assert!((machine.move_distance() - 600.0).abs() < 1e-9);
        let placed: Vec<(PanelId, f64)> = outcome
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::PlacePanel { panel, offset } => Some((*panel, *offset)),
                _ => None,
            })
            .collect();
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].0, PanelId(0));
        assert!((placed[0].1 + 600.0).abs() < 1e-6);
        assert_eq!(placed[1].0, PanelId(1));
        assert!((placed[1].1 - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_touch_uses_its_own_sensitivity() {
        let mut machine = captured_machine();
        let now = Instant::now();
        machine.touch_start(800.0);
        let outcome = machine.touch_move(700.0, now);
        assert!(outcome.prevent_default);
        assert!((machine.progress().value() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_touch_swipe_past_end_releases_after_delay() {
        let mut machine = captured_machine();
        let start = Instant::now();
        machine.touch_start(800.0);

        let outcome = machine.touch_move(400.0, start);
        assert!(outcome.prevent_default);
        assert_eq!(machine.progress(), Progress::END);
        assert_eq!(animated_targets(&outcome), vec![(PanelId(0), -1200.0), (PanelId(1), 1200.0)]);
        assert_eq!(machine.next_deadline(), Some(start + Duration::from_millis(150)));

        assert!(machine.poll(start + Duration::from_millis(149)).is_empty());
        assert!(machine.is_active());
        assert!(releases(&machine.poll(start + Duration::from_millis(150))));
        assert!(!machine.is_active());
    }

    #[test]
    fn test_touch_swipe_past_start_releases() {
        let mut machine = captured_machine();
        let start = Instant::now();
        machine.touch_start(400.0);

        machine.touch_move(450.0, start);
        assert_eq!(machine.progress(), Progress::START);
        assert_eq!(machine.next_deadline(), Some(start + Duration::from_millis(150)));
        assert!(releases(&machine.poll(start + Duration::from_millis(150))));
    }

    #[test]
    fn test_touch_reversal_cancels_release() {
        let mut machine = captured_machine();
        let start = Instant::now();
        machine.touch_start(800.0);
        machine.touch_move(400.0, start);
        assert!(machine.next_deadline().is_some());

        // Finger drifts back down before the deadline
        let outcome = machine.touch_move(410.0, start + Duration::from_millis(100));
        assert!(outcome.prevent_default);
        assert_eq!(machine.next_deadline(), None);
        assert!((machine.progress().value() - 0.97).abs() < 1e-9);
        assert!(machine.poll(start + Duration::from_millis(500)).is_empty());
        assert!(machine.is_active());
    }

    #[test]
    fn test_unmount_releases_and_silences() {
        let mut machine = captured_machine();
        let now = Instant::now();
        machine.wheel(WheelDelta::new(200.0), now);

        let outcome = machine.unmount();
        assert!(releases(&outcome));
        assert!(!machine.is_active());

        assert!(machine.intersection(visible(1.0)).is_empty());
        assert!(machine.wheel(WheelDelta::new(100.0), now).is_empty());
        assert!(machine.resize(Some(800.0)).is_empty());
        assert!(machine.unmount().is_empty());
    }

    #[test]
    fn test_missing_panels_make_everything_a_no_op() {
        let mut machine = CaptureMachine::new(CaptureConfig::default());
        let now = Instant::now();
        assert!(machine.mount(None, Some(1000.0)).is_empty());
        assert!(machine.intersection(visible(1.0)).is_empty());
        assert!(machine.wheel(WheelDelta::new(100.0), now).is_empty());
        assert!(machine.resize(Some(640.0)).is_empty());
        assert!(!machine.is_active());
    }

    #[test]
    fn test_zero_width_means_no_motion() {
        let mut machine = CaptureMachine::new(CaptureConfig::default());
        machine.mount(Some(PANELS), None);
        machine.intersection(visible(1.0));
        let outcome = machine.wheel(WheelDelta::new(300.0), Instant::now());
        assert!(animated_targets(&outcome).iter().all(|(_, target)| *target == 0.0));
    }

    #[test]
    fn test_zero_delay_releases_immediately() {
        let config = CaptureConfig {
            release_delay_ms: 0,
            ..Default::default()
        };
        let mut machine = CaptureMachine::new(config);
        machine.mount(Some(PANELS), Some(1000.0));
        machine.intersection(visible(1.0));
        let outcome = machine.wheel(WheelDelta::new(-50.0), Instant::now());
        assert!(releases(&outcome));
        assert!(!machine.is_active());
    }
}
