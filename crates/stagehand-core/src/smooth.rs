//! Page-level smooth scrolling
//!
//! Wheel deltas move a target position; the visible position eases towards
//! it over a fixed duration. A capturing section stops the scroller while it
//! owns input and starts it again on release.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::SmoothScrollConfig;
use crate::motion::easing::{EasingType, EasingTypeExt};
use crate::motion::timing::{is_complete, lerp, progress};
use crate::platform::ScrollController;

/// Active page scroll animation
#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Smooth page scroller
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    animation: Option<ActiveAnimation>,
    config: SmoothScrollConfig,
    /// Visible scroll position in pixels
    current: f64,
    /// Position the page is heading to
    target: f64,
    /// Largest scroll position (content height minus viewport height)
    limit: f64,
    stopped: bool,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(SmoothScrollConfig::default())
    }
}

impl SmoothScroll {
    pub fn new(config: SmoothScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0.0,
            target: 0.0,
            limit: 0.0,
            stopped: false,
        }
    }

    pub fn config(&self) -> &SmoothScrollConfig {
        &self.config
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn limit(&self) -> f64 {
        self.limit
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn is_smooth(&self) -> bool {
        self.config.enabled && self.config.duration_ms > 0
    }

    /// Update the scrollable range, keeping both positions inside it
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = if limit.is_finite() { limit.max(0.0) } else { 0.0 };
        self.current = self.current.clamp(0.0, self.limit);
        self.target = self.target.clamp(0.0, self.limit);
        if let Some(ref mut anim) = self.animation {
            anim.to = anim.to.clamp(0.0, self.limit);
        }
    }

    /// Feed a wheel delta. Returns false when the scroller is stopped and
    /// the input was ignored.
    pub fn on_wheel(&mut self, delta: f64, now: Instant) -> bool {
        if self.stopped {
            return false;
        }
        if !delta.is_finite() {
            return true;
        }
        let target = self.target + delta * self.config.wheel_multiplier;
        self.scroll_to(target, now, false);
        true
    }

    /// Scroll to `target`, animated unless `immediate` or smoothing is off
    pub fn scroll_to(&mut self, target: f64, now: Instant, immediate: bool) {
        let target = target.clamp(0.0, self.limit);
        self.target = target;

        if immediate || !self.is_smooth() {
            self.current = target;
            self.animation = None;
            return;
        }

        // Start from the visible position so retargeting never jumps
        let from = self.sample(now);
        if from == target {
            self.current = target;
            self.animation = None;
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from,
            to: target,
            duration: Duration::from_millis(self.config.duration_ms),
            easing: self.config.easing,
        });
    }

    fn sample(&self, now: Instant) -> f64 {
        match self.animation {
            Some(ref anim) if !is_complete(anim.start, anim.duration, now) => {
                let t = progress(anim.start, anim.duration, now);
                lerp(anim.from, anim.to, anim.easing.apply(t))
            }
            Some(ref anim) => anim.to,
            None => self.current,
        }
    }

    /// Advance the animation and return the visible position
    pub fn update(&mut self, now: Instant) -> f64 {
        if let Some(ref anim) = self.animation {
            if is_complete(anim.start, anim.duration, now) {
                self.current = anim.to.min(self.limit);
                self.animation = None;
            } else {
                self.current = self.sample(now).clamp(0.0, self.limit);
            }
        }
        self.current
    }

    /// Stop responding to input and freeze at the visible position
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.animation = None;
        self.target = self.current;
        debug!(position = self.current, "smooth scroll stopped");
    }

    /// Resume responding to input
    pub fn start(&mut self) {
        if !self.stopped {
            return;
        }
        self.stopped = false;
        debug!(position = self.current, "smooth scroll started");
    }
}

impl ScrollController for SmoothScroll {
    fn pause(&mut self) {
        self.stop();
    }

    fn start(&mut self) {
        SmoothScroll::start(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroller(limit: f64) -> SmoothScroll {
        let mut scroll = SmoothScroll::new(SmoothScrollConfig {
            easing: EasingType::Linear,
            duration_ms: 1000,
            ..Default::default()
        });
        scroll.set_limit(limit);
        scroll
    }

    #[test]
    fn test_wheel_eases_towards_target() {
        let mut scroll = scroller(1000.0);
        let start = Instant::now();

        assert!(scroll.on_wheel(100.0, start));
        assert_eq!(scroll.target(), 100.0);
        assert!(scroll.is_animating());

        let mid = scroll.update(start + Duration::from_millis(500));
        assert!((mid - 50.0).abs() < 1e-6);

        assert_eq!(scroll.update(start + Duration::from_secs(1)), 100.0);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_wheel_deltas_accumulate_on_target() {
        let mut scroll = scroller(1000.0);
        let now = Instant::now();
        scroll.on_wheel(100.0, now);
        scroll.on_wheel(100.0, now);
        scroll.on_wheel(100.0, now);
        assert_eq!(scroll.target(), 300.0);
    }

    #[test]
    fn test_target_clamped_to_limit() {
        let mut scroll = scroller(250.0);
        let now = Instant::now();
        scroll.on_wheel(1000.0, now);
        assert_eq!(scroll.target(), 250.0);
        scroll.on_wheel(-5000.0, now);
        assert_eq!(scroll.target(), 0.0);
    }

    #[test]
    fn test_stopped_scroller_ignores_input() {
        let mut scroll = scroller(1000.0);
        let start = Instant::now();
        scroll.on_wheel(200.0, start);
        scroll.update(start + Duration::from_millis(500));

        ScrollController::pause(&mut scroll);
        assert!(scroll.is_stopped());
        assert!(!scroll.on_wheel(100.0, start + Duration::from_millis(600)));
        // Frozen where it was when stopped
        assert_eq!(scroll.update(start + Duration::from_secs(2)), 100.0);

        ScrollController::start(&mut scroll);
        assert!(scroll.on_wheel(100.0, start + Duration::from_secs(2)));
        assert_eq!(scroll.target(), 200.0);
    }

    #[test]
    fn test_instant_scroll_when_disabled() {
        let mut scroll = SmoothScroll::new(SmoothScrollConfig {
            enabled: false,
            ..Default::default()
        });
        scroll.set_limit(500.0);
        scroll.on_wheel(120.0, Instant::now());
        assert_eq!(scroll.current(), 120.0);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_shrinking_limit_clamps_position() {
        let mut scroll = scroller(1000.0);
        scroll.scroll_to(800.0, Instant::now(), true);
        scroll.set_limit(300.0);
        assert_eq!(scroll.current(), 300.0);
        assert_eq!(scroll.target(), 300.0);
    }
}
