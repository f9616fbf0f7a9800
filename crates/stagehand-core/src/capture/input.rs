//! Raw wheel and touch input, reduced to signed vertical deltas

use serde::{Deserialize, Serialize};

/// A wheel event. Positive deltas scroll down (forward through the gesture).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelDelta {
    pub delta_y: f64,
    /// Legacy line-based delta, consulted only when `delta_y` is zero
    #[serde(default)]
    pub detail: f64,
}

impl WheelDelta {
    pub fn new(delta_y: f64) -> Self {
        Self {
            delta_y,
            detail: 0.0,
        }
    }

    /// Delta to feed into progress; 0 when nothing usable was reported
    pub fn effective(&self) -> f64 {
        if self.delta_y != 0.0 && self.delta_y.is_finite() {
            self.delta_y
        } else if self.detail.is_finite() {
            self.detail
        } else {
            0.0
        }
    }
}

/// Tracks consecutive touch points of a single swipe
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    last_y: Option<f64>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember where the finger went down
    pub fn start(&mut self, y: f64) {
        self.last_y = y.is_finite().then_some(y);
    }

    /// Delta since the previous touch point, `last - current`, so swiping
    /// up (finger moving towards the top) is a positive, forward delta.
    /// A move without a preceding start only anchors the swipe.
    pub fn move_to(&mut self, y: f64) -> f64 {
        if !y.is_finite() {
            return 0.0;
        }
        let delta = self.last_y.map(|last| last - y).unwrap_or(0.0);
        self.last_y = Some(y);
        delta
    }

    pub fn reset(&mut self) {
        self.last_y = None;
    }
}
