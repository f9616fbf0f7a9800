//! Viewport intersection detection for vertically stacked sections

use serde::{Deserialize, Serialize};

/// Thresholds reported on, matching the card stack's observer
pub const DEFAULT_THRESHOLDS: [f64; 6] = [0.0, 0.25, 0.5, 0.75, 0.9, 1.0];

/// A vertical span in page pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub top: f64,
    pub height: f64,
}

impl Span {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Pixels of `self` that fall inside `other`
    pub fn overlap(&self, other: &Span) -> f64 {
        (self.bottom().min(other.bottom()) - self.top.max(other.top)).max(0.0)
    }
}

/// One observer notification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    /// Visible fraction of the target, in [0, 1]
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Compute the entry for `target` seen through `viewport`
    pub fn measure(target: &Span, viewport: &Span) -> Self {
        let visible = target.overlap(viewport);
        let ratio = if target.height > 0.0 {
            (visible / target.height).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            ratio,
            is_intersecting: visible > 0.0,
        }
    }
}

/// Turns a continuous stream of measurements into threshold crossings
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    thresholds: Vec<f64>,
    last_bucket: Option<usize>,
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLDS.to_vec())
    }
}

impl VisibilityTracker {
    pub fn new(mut thresholds: Vec<f64>) -> Self {
        thresholds.retain(|t| t.is_finite());
        thresholds.sort_by(|a, b| a.total_cmp(b));
        thresholds.dedup();
        Self {
            thresholds,
            last_bucket: None,
        }
    }

    fn bucket(&self, entry: &IntersectionEntry) -> usize {
        if !entry.is_intersecting {
            return 0;
        }
        self.thresholds.iter().filter(|t| entry.ratio >= **t).count()
    }

    /// Report `entry` if it crossed a threshold since the last measurement.
    /// The first measurement is always reported.
    pub fn observe(&mut self, entry: IntersectionEntry) -> Option<IntersectionEntry> {
        let bucket = self.bucket(&entry);
        if self.last_bucket == Some(bucket) {
            return None;
        }
        self.last_bucket = Some(bucket);
        Some(entry)
    }

    /// Forget the last measurement so the next one is reported
    pub fn reset(&mut self) {
        self.last_bucket = None;
    }
}
