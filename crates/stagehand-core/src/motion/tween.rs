//! L3 Molecular Layer: Keyed tween engine
//!
//! Combines easing and timing to interpolate one numeric value per key.
//! Starting a tween for a key that is already moving retargets it from the
//! value currently on screen, so rapid reversals never queue up.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp, progress};
use crate::platform::{PanelAnimator, PanelId, PanelTween};

/// Active tween state for one key
#[derive(Debug, Clone)]
struct ActiveTween {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

impl ActiveTween {
    fn sample(&self, now: Instant) -> f64 {
        if is_complete(self.start, self.duration, now) {
            return self.to;
        }
        let t = progress(self.start, self.duration, now);
        lerp(self.from, self.to, self.easing.apply(t))
    }
}

/// Tween engine
///
/// Call `animate()` to start moving a key, then `update()` each frame and
/// `sample()` to read values for drawing.
#[derive(Debug, Clone)]
pub struct TweenEngine<K = PanelId> {
    /// Resting values of keys with no active tween
    values: HashMap<K, f64>,
    tweens: HashMap<K, ActiveTween>,
}

impl<K> Default for TweenEngine<K> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            tweens: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> TweenEngine<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tween `key` towards `to`, replacing any tween already in flight
    pub fn animate(&mut self, key: K, to: f64, duration: Duration, easing: EasingType, now: Instant) {
        let from = self.sample(key, now);

        if duration.is_zero() || from == to {
            self.set(key, to);
            return;
        }

        self.tweens.insert(
            key,
            ActiveTween {
                start: now,
                from,
                to,
                duration,
                easing,
            },
        );
    }

    /// Jump `key` to `value`, cancelling its tween
    pub fn set(&mut self, key: K, value: f64) {
        self.tweens.remove(&key);
        self.values.insert(key, value);
    }

    /// Current value of `key` (0.0 for keys never touched)
    pub fn sample(&self, key: K, now: Instant) -> f64 {
        match self.tweens.get(&key) {
            Some(tween) => tween.sample(now),
            None => self.values.get(&key).copied().unwrap_or(0.0),
        }
    }

    /// Value `key` is heading to
    pub fn target(&self, key: K) -> f64 {
        self.tweens
            .get(&key)
            .map(|t| t.to)
            .unwrap_or_else(|| self.values.get(&key).copied().unwrap_or(0.0))
    }

    /// Retire finished tweens. Returns true while anything is still moving.
    pub fn update(&mut self, now: Instant) -> bool {
        let finished: Vec<K> = self
            .tweens
            .iter()
            .filter(|(_, t)| is_complete(t.start, t.duration, now))
            .map(|(k, _)| *k)
            .collect();

        for key in finished {
            if let Some(tween) = self.tweens.remove(&key) {
                self.values.insert(key, tween.to);
            }
        }

        !self.tweens.is_empty()
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Number of tweens in flight
    #[inline]
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }
}

impl PanelAnimator for TweenEngine<PanelId> {
    fn animate(&mut self, panel: PanelId, tween: PanelTween, now: Instant) {
        TweenEngine::animate(self, panel, tween.target, tween.duration, tween.easing, now);
    }

    fn set(&mut self, panel: PanelId, offset: f64) {
        TweenEngine::set(self, panel, offset);
    }
}
