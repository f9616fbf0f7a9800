//! Capture controller: the state machine wired to real capabilities
//!
//! Owns the smooth-scroll handle, the panel animator and the page host, and
//! performs every effect the machine asks for, in order.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::arbiter::{CaptureArbiter, ControllerId};
use super::input::WheelDelta;
use super::machine::{CaptureMachine, CaptureSnapshot, Effect, Outcome};
use super::progress::Progress;
use crate::config::CaptureConfig;
use crate::platform::{PageHost, PanelAnimator, PanelPair, ScrollController};
use crate::visibility::IntersectionEntry;

/// Mount lifecycle of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    Stopped,
}

/// Any input a host can feed to a controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CaptureInput {
    Intersection(IntersectionEntry),
    Wheel(WheelDelta),
    TouchStart { y: f64 },
    TouchMove { y: f64 },
    Resize { viewport_width: f64 },
    /// Time passing; fires a due release
    Tick,
}

pub struct CaptureController<S, A, H> {
    id: ControllerId,
    arbiter: CaptureArbiter,
    machine: CaptureMachine,
    scroll: S,
    animator: A,
    host: H,
    lifecycle: Lifecycle,
}

impl<S, A, H> std::fmt::Debug for CaptureController<S, A, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("id", &self.id)
            .field("lifecycle", &self.lifecycle)
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

impl<S, A, H> CaptureController<S, A, H>
where
    S: ScrollController,
    A: PanelAnimator,
    H: PageHost,
{
    /// Controller with a private arbiter (the only capturable section)
    pub fn new(config: CaptureConfig, scroll: S, animator: A, host: H) -> Self {
        Self::with_arbiter(config, &CaptureArbiter::new(), scroll, animator, host)
    }

    /// Controller sharing `arbiter` with the other sections of the page
    pub fn with_arbiter(
        config: CaptureConfig,
        arbiter: &CaptureArbiter,
        scroll: S,
        animator: A,
        host: H,
    ) -> Self {
        Self {
            id: arbiter.register(),
            arbiter: arbiter.clone(),
            machine: CaptureMachine::new(config),
            scroll,
            animator,
            host,
            lifecycle: Lifecycle::Created,
        }
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn machine(&self) -> &CaptureMachine {
        &self.machine
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.machine.is_active()
    }

    #[inline]
    pub fn progress(&self) -> Progress {
        self.machine.progress()
    }

    pub fn snapshot(&self) -> CaptureSnapshot {
        self.machine.snapshot()
    }

    /// When the host should call `poll()` next, if a release is pending
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.lifecycle == Lifecycle::Running {
            self.machine.next_deadline()
        } else {
            None
        }
    }

    pub fn scroll(&self) -> &S {
        &self.scroll
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mount: measure, place panels and start listening
    pub fn start(&mut self, panels: Option<PanelPair>, viewport_width: Option<f64>, now: Instant) -> Outcome {
        if self.lifecycle == Lifecycle::Running {
            return Outcome::default();
        }
        self.lifecycle = Lifecycle::Running;
        debug!(id = %self.id, ?viewport_width, "capture controller started");
        self.run(now, |machine| machine.mount(panels, viewport_width))
    }

    /// Unmount. Releases capture if held; safe to call repeatedly.
    pub fn stop(&mut self, now: Instant) -> Outcome {
        if self.lifecycle != Lifecycle::Running {
            return Outcome::default();
        }
        let outcome = self.run(now, CaptureMachine::unmount);
        self.lifecycle = Lifecycle::Stopped;
        debug!(id = %self.id, "capture controller stopped");
        outcome
    }

    pub fn dispatch(&mut self, input: CaptureInput, now: Instant) -> Outcome {
        match input {
            CaptureInput::Intersection(entry) => self.on_intersection(entry, now),
            CaptureInput::Wheel(wheel) => self.on_wheel(wheel, now),
            CaptureInput::TouchStart { y } => self.on_touch_start(y, now),
            CaptureInput::TouchMove { y } => self.on_touch_move(y, now),
            CaptureInput::Resize { viewport_width } => self.on_resize(Some(viewport_width), now),
            CaptureInput::Tick => self.poll(now),
        }
    }

    pub fn on_intersection(&mut self, entry: IntersectionEntry, now: Instant) -> Outcome {
        self.run(now, |machine| machine.intersection(entry))
    }

    pub fn on_wheel(&mut self, wheel: WheelDelta, now: Instant) -> Outcome {
        self.run(now, |machine| machine.wheel(wheel, now))
    }

    pub fn on_touch_start(&mut self, y: f64, now: Instant) -> Outcome {
        self.run(now, |machine| machine.touch_start(y))
    }

    pub fn on_touch_move(&mut self, y: f64, now: Instant) -> Outcome {
        self.run(now, |machine| machine.touch_move(y, now))
    }

    pub fn on_resize(&mut self, viewport_width: Option<f64>, now: Instant) -> Outcome {
        self.run(now, |machine| machine.resize(viewport_width))
    }

    /// Fire a due release
    pub fn poll(&mut self, now: Instant) -> Outcome {
        self.run(now, |machine| machine.poll(now))
    }

    fn run<F>(&mut self, now: Instant, step: F) -> Outcome
    where
        F: FnOnce(&mut CaptureMachine) -> Outcome,
    {
        if self.lifecycle != Lifecycle::Running {
            return Outcome::default();
        }

        // Another section took the page while we thought we held it
        if self.machine.is_active() && !self.arbiter.is_held_by(self.id) {
            warn!(id = %self.id, "capture lost to another section");
            self.machine.evict();
        }

        let was_active = self.machine.is_active();
        let outcome = step(&mut self.machine);
        let is_active = self.machine.is_active();

        if !was_active && is_active {
            self.arbiter.acquire(self.id);
        }
        self.apply(&outcome, now);
        if was_active && !is_active {
            self.arbiter.release(self.id);
        }

        outcome
    }

    fn apply(&mut self, outcome: &Outcome, now: Instant) {
        for effect in &outcome.effects {
            match *effect {
                Effect::PauseSmoothScroll => self.scroll.pause(),
                Effect::BlockPageScroll => self.host.block_scroll(),
                Effect::AttachListeners => self.host.attach_capture_listeners(),
                Effect::AnimatePanel { panel, tween } => self.animator.animate(panel, tween, now),
                Effect::PlacePanel { panel, offset } => self.animator.set(panel, offset),
                Effect::UnblockPageScroll => self.host.unblock_scroll(),
                Effect::DetachListeners => self.host.detach_capture_listeners(),
                Effect::ResumeSmoothScroll => self.scroll.start(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use crate::motion::TweenEngine;
    use crate::platform::{PageState, PanelId, PanelTween};

    const PANELS: PanelPair = PanelPair {
        leading: PanelId(0),
        trailing: PanelId(1),
    };

    /// Records every capability call into one shared log
    #[derive(Clone, Default)]
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Recorder {
        fn calls(&self) -> Vec<String> {
            self.log.borrow().clone()
        }

        fn count(&self, call: &str) -> usize {
            self.log.borrow().iter().filter(|c| c.as_str() == call).count()
        }

        fn push(&self, call: impl Into<String>) {
            self.log.borrow_mut().push(call.into());
        }
    }

    impl ScrollController for Recorder {
        fn pause(&mut self) {
            self.push("pause");
        }

        fn start(&mut self) {
            self.push("start");
        }
    }

    impl PanelAnimator for Recorder {
        fn animate(&mut self, panel: PanelId, tween: PanelTween, _now: Instant) {
            self.push(format!("animate {} {:.0}", panel.0, tween.target));
        }

        fn set(&mut self, panel: PanelId, offset: f64) {
            self.push(format!("set {} {:.0}", panel.0, offset));
        }
    }

    impl PageHost for Recorder {
        fn block_scroll(&mut self) {
            self.push("block");
        }

        fn unblock_scroll(&mut self) {
            self.push("unblock");
        }

        fn attach_capture_listeners(&mut self) {
            self.push("attach");
        }

        fn detach_capture_listeners(&mut self) {
            self.push("detach");
        }
    }

    fn visible() -> IntersectionEntry {
        IntersectionEntry {
            ratio: 1.0,
            is_intersecting: true,
        }
    }

    fn recorded() -> (CaptureController<Recorder, Recorder, Recorder>, Recorder) {
        let recorder = Recorder::default();
        let controller = CaptureController::new(
            CaptureConfig::default(),
            recorder.clone(),
            recorder.clone(),
            recorder.clone(),
        );
        (controller, recorder)
    }

    #[test]
    fn test_capture_side_effects_are_ordered() {
        let (mut controller, recorder) = recorded();
        let start = Instant::now();
        controller.start(Some(PANELS), Some(1000.0), start);
        controller.on_intersection(visible(), start);
        controller.on_wheel(WheelDelta::new(600.0), start);
        controller.poll(start + Duration::from_millis(150));

        assert_eq!(
            recorder.calls(),
            vec![
                "set 0 0", "set 1 0", "pause", "block", "attach", "animate 0 -1200",
                "animate 1 1200", "unblock", "detach", "start",
            ]
        );
    }

    #[test]
    fn test_release_starts_smooth_scroll_exactly_once() {
        let (mut controller, recorder) = recorded();
        let start = Instant::now();
        controller.start(Some(PANELS), Some(1000.0), start);
        controller.on_intersection(visible(), start);
        controller.on_wheel(WheelDelta::new(2000.0), start);

        for ms in [10, 100, 149, 150, 151, 400, 2000] {
            controller.poll(start + Duration::from_millis(ms));
        }
        assert_eq!(recorder.count("start"), 1);
        assert!(!controller.is_active());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn test_interrupted_release_keeps_capture() {
        let (mut controller, recorder) = recorded();
        let start = Instant::now();
        controller.start(Some(PANELS), Some(1000.0), start);
        controller.on_intersection(visible(), start);
        controller.on_wheel(WheelDelta::new(2000.0), start);
        controller.on_wheel(WheelDelta::new(-40.0), start + Duration::from_millis(80));
        controller.poll(start + Duration::from_millis(400));

        assert!(controller.is_active());
        assert_eq!(recorder.count("start"), 0);
    }

    #[test]
    fn test_stop_while_captured_releases_once_and_silences() {
        let (mut controller, recorder) = recorded();
        let start = Instant::now();
        controller.start(Some(PANELS), Some(1000.0), start);
        controller.on_intersection(visible(), start);
        controller.on_wheel(WheelDelta::new(180.0), start);

        controller.stop(start);
        controller.stop(start);
        assert_eq!(recorder.count("start"), 1);
        assert_eq!(recorder.count("detach"), 1);
        assert_eq!(controller.lifecycle(), Lifecycle::Stopped);

        let calls = recorder.calls().len();
        let later = start + Duration::from_secs(1);
        for input in [
            CaptureInput::Intersection(visible()),
            CaptureInput::Wheel(WheelDelta::new(100.0)),
            CaptureInput::TouchStart { y: 300.0 },
            CaptureInput::TouchMove { y: 100.0 },
            CaptureInput::Resize { viewport_width: 640.0 },
            CaptureInput::Tick,
        ] {
            assert!(controller.dispatch(input, later).is_empty());
        }
        assert_eq!(recorder.calls().len(), calls);
    }

    #[test]
    fn test_stop_drops_pending_release() {
        let (mut controller, recorder) = recorded();
        let start = Instant::now();
        controller.start(Some(PANELS), Some(1000.0), start);
        controller.on_intersection(visible(), start);
        controller.on_wheel(WheelDelta::new(-5.0), start);
        assert!(controller.next_deadline().is_some());

        controller.stop(start + Duration::from_millis(10));
        controller.poll(start + Duration::from_millis(500));
        assert_eq!(recorder.count("start"), 1);
    }

    #[test]
    fn test_stop_before_capture_leaves_scroll_alone() {
        let (mut controller, recorder) = recorded();
        let now = Instant::now();
        controller.start(Some(PANELS), Some(1000.0), now);
        controller.stop(now);
        assert_eq!(recorder.count("start"), 0);
        assert_eq!(recorder.count("pause"), 0);
    }

    #[test]
    fn test_overwrite_keeps_one_tween_per_panel() {
        let mut controller = CaptureController::new(
            CaptureConfig::default(),
            Recorder::default(),
            TweenEngine::<PanelId>::new(),
            PageState::new(),
        );
        let start = Instant::now();
        controller.start(Some(PANELS), Some(1000.0), start);
        controller.on_intersection(visible(), start);
        assert!(controller.host().listeners_attached());

        for i in 0..50u64 {
            let delta = if i % 2 == 0 { 90.0 } else { -60.0 };
            controller.on_wheel(WheelDelta::new(delta), start + Duration::from_millis(i * 5));
        }
        assert!(controller.animator().active_count() <= 2);
    }

    #[test]
    fn test_resize_mid_capture_rescales_drawn_panels() {
        let mut controller = CaptureController::new(
            CaptureConfig::default(),
            Recorder::default(),
            TweenEngine::<PanelId>::new(),
            PageState::new(),
        );
        let start = Instant::now();
        controller.start(Some(PANELS), Some(1000.0), start);
        controller.on_intersection(visible(), start);
        controller.on_wheel(WheelDelta::new(250.0), start);
        let progress = controller.progress();

        controller.on_resize(Some(2000.0), start + Duration::from_millis(10));
        assert_eq!(controller.progress(), progress);
        let now = start + Duration::from_millis(10);
        assert!((controller.animator().sample(PanelId(0), now) + 2400.0).abs() < 1e-6);
        assert!((controller.animator().sample(PanelId(1), now)).abs() < 1e-6);
    }

    #[test]
    fn test_overlapping_sections_hand_over_capture() {
        let arbiter = CaptureArbiter::new();
        let first_log = Recorder::default();
        let second_log = Recorder::default();
        let mut first = CaptureController::with_arbiter(
            CaptureConfig::default(),
            &arbiter,
            first_log.clone(),
            first_log.clone(),
            first_log.clone(),
        );
        let mut second = CaptureController::with_arbiter(
            CaptureConfig::default(),
            &arbiter,
            second_log.clone(),
            second_log.clone(),
            second_log.clone(),
        );
        let now = Instant::now();
        first.start(Some(PANELS), Some(1000.0), now);
        second.start(Some(PANELS), Some(1000.0), now);

        first.on_intersection(visible(), now);
        second.on_intersection(visible(), now);
        assert_eq!(arbiter.holder(), Some(second.id()));

        // The evicted section goes idle without touching page state
        let outcome = first.on_wheel(WheelDelta::new(100.0), now);
        assert!(outcome.is_empty());
        assert!(!first.is_active());
        first.stop(now);
        assert_eq!(first_log.count("start"), 0);
        assert_eq!(first_log.count("unblock"), 0);
        assert_eq!(first_log.count("detach"), 0);

        second.stop(now);
        assert_eq!(second_log.count("start"), 1);
        assert_eq!(arbiter.holder(), None);
    }

    #[test]
    fn test_script_input_deserializes() {
        let input: CaptureInput = serde_json::from_str(r#"{"type":"wheel","delta_y":120.0}"#).unwrap();
        assert_eq!(input, CaptureInput::Wheel(WheelDelta::new(120.0)));

        let input: CaptureInput =
            serde_json::from_str(r#"{"type":"intersection","ratio":0.95,"is_intersecting":true}"#).unwrap();
        assert!(matches!(input, CaptureInput::Intersection(entry) if entry.ratio > 0.9));
    }
}
