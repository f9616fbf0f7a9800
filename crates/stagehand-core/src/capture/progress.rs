//! Gesture progress and the two-phase panel mapping

use serde::Serialize;

/// How far through the pinned gesture the user is, always in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Progress(f64);

impl Progress {
    pub const START: Progress = Progress(0.0);
    pub const END: Progress = Progress(1.0);

    /// Clamp `value` into [0, 1]. NaN becomes 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Progress after moving by `step`, clamped
    pub fn advance(self, step: f64) -> Self {
        if !step.is_finite() {
            return self;
        }
        Self::new(self.0 + step)
    }
}

/// Horizontal offsets of the two moving panels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PanelOffsets {
    /// Leading panel: 0 to -D over the first half, then holds
    pub leading: f64,
    /// Trailing panel: holds at 0 until halfway, then 0 to +D
    pub trailing: f64,
}

impl PanelOffsets {
    /// Offsets for `progress` with move distance `distance`
    pub fn at(progress: Progress, distance: f64) -> Self {
        let p = progress.value();
        let leading_phase = (p * 2.0).min(1.0);
        let trailing_phase = ((p - 0.5) * 2.0).max(0.0);
        Self {
            leading: 0.0 - leading_phase * distance,
            trailing: trailing_phase * distance,
        }
    }
}

/// Distance a panel travels over the whole gesture.
///
/// Missing or nonsensical measurements give 0, which keeps the panels still
/// until the next resize supplies a usable width.
pub fn move_distance(viewport_width: Option<f64>, factor: f64) -> f64 {
    match viewport_width {
        Some(width) if width.is_finite() && width > 0.0 && factor.is_finite() => {
            (width * factor).max(0.0)
        }
        _ => 0.0,
    }
}
