//! Character-split text reveals
//!
//! A heading is split into words and glyphs; each glyph animates in on its
//! own, offset from the previous one by a fixed stagger. The whole timeline
//! plays when the heading scrolls into view and rewinds when it scrolls back
//! out below the viewport.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::RevealConfig;
use crate::motion::easing::{EasingType, EasingTypeExt};

/// How each glyph enters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealEffect {
    /// Slide in from the right, clipped by the glyph's own box
    #[default]
    Routine,
    /// Rotate up around the X axis while fading in
    Flip,
    /// Fade in from a heavy blur, edges first
    Blur,
    /// Grow from 60% while fading in
    Scale,
}

impl RevealEffect {
    fn easing(self) -> EasingType {
        match self {
            RevealEffect::Routine => EasingType::EaseOut,
            RevealEffect::Flip | RevealEffect::Blur => EasingType::QuadInOut,
            RevealEffect::Scale => EasingType::Quintic,
        }
    }

    fn frame(self, eased: f64) -> GlyphFrame {
        let rest = 1.0 - eased;
        match self {
            RevealEffect::Routine => GlyphFrame {
                offset_x: 1.05 * rest,
                ..GlyphFrame::REST
            },
            RevealEffect::Flip => GlyphFrame {
                opacity: eased,
                offset_y: 0.5 * rest,
                rotation_x: -90.0 * rest,
                ..GlyphFrame::REST
            },
            RevealEffect::Blur => GlyphFrame {
                opacity: eased,
                blur_px: 20.0 * rest,
                ..GlyphFrame::REST
            },
            RevealEffect::Scale => GlyphFrame {
                opacity: eased,
                scale: 0.6 + 0.4 * eased,
                ..GlyphFrame::REST
            },
        }
    }
}

/// One character of the split text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    /// Index of the word the glyph belongs to
    pub word: usize,
    /// Position in the stagger order; None for word separators
    pub rank: Option<usize>,
}

/// Visual state of a glyph at one instant. Offsets are in glyph sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphFrame {
    pub opacity: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    pub blur_px: f64,
    pub rotation_x: f64,
}

impl GlyphFrame {
    /// Fully revealed
    pub const REST: GlyphFrame = GlyphFrame {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
        blur_px: 0.0,
        rotation_x: 0.0,
    };

    /// Whether a cell renderer should draw the glyph at all
    pub fn is_legible(&self) -> bool {
        self.opacity >= 0.5
            && self.offset_x.abs() < 0.5
            && self.offset_y.abs() < 0.5
            && self.scale >= 0.8
            && self.blur_px < 10.0
            && self.rotation_x.abs() < 45.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Split `text` into glyphs. Words are separated by single spaces which
/// are kept as unranked glyphs.
pub fn split(text: &str, effect: RevealEffect) -> Vec<Glyph> {
    let mut glyphs = Vec::new();
    let words: Vec<&str> = text.split(' ').collect();
    for (word_index, word) in words.iter().enumerate() {
        for ch in word.chars() {
            glyphs.push(Glyph {
                ch,
                word: word_index,
                rank: Some(0),
            });
        }
        if word_index + 1 < words.len() {
            glyphs.push(Glyph {
                ch: ' ',
                word: word_index,
                rank: None,
            });
        }
    }

    let animated = glyphs.iter().filter(|g| g.rank.is_some()).count();
    let mut position = 0;
    for glyph in glyphs.iter_mut().filter(|g| g.rank.is_some()) {
        glyph.rank = Some(stagger_rank(position, animated, effect));
        position += 1;
    }
    glyphs
}

/// Reading order for most effects; edges towards the centre for blur
fn stagger_rank(position: usize, count: usize, effect: RevealEffect) -> usize {
    match effect {
        RevealEffect::Blur => {
            let mirrored = count - 1 - position;
            if position <= mirrored {
                2 * position
            } else {
                2 * mirrored + 1
            }
        }
        _ => position,
    }
}

/// Staggered reveal timeline for one heading
#[derive(Debug, Clone)]
pub struct TextReveal {
    glyphs: Vec<Glyph>,
    effect: RevealEffect,
    delay: Duration,
    stagger: Duration,
    duration: Duration,
    /// Playhead at the moment the timeline last changed direction
    anchor: Option<(Instant, Duration)>,
    direction: Direction,
}

impl TextReveal {
    pub fn new(text: &str, effect: RevealEffect, config: &RevealConfig) -> Self {
        Self {
            glyphs: split(text, effect),
            effect,
            delay: Duration::from_millis(config.delay_ms),
            stagger: Duration::from_millis(config.stagger_ms),
            duration: Duration::from_millis(config.duration_ms),
            anchor: None,
            direction: Direction::Backward,
        }
    }

    fn animated_count(&self) -> usize {
        self.glyphs.iter().filter(|g| g.rank.is_some()).count()
    }

    /// Length of the whole timeline
    pub fn total(&self) -> Duration {
        match self.animated_count() {
            0 => Duration::ZERO,
            n => self.delay + self.stagger * (n as u32 - 1) + self.duration,
        }
    }

    fn position(&self, now: Instant) -> Duration {
        let Some((since, at)) = self.anchor else {
            return Duration::ZERO;
        };
        let elapsed = now.saturating_duration_since(since);
        match self.direction {
            Direction::Forward => (at + elapsed).min(self.total()),
            Direction::Backward => at.saturating_sub(elapsed),
        }
    }

    /// Play forward from wherever the playhead is
    pub fn play(&mut self, now: Instant) {
        if self.direction == Direction::Forward {
            return;
        }
        self.anchor = Some((now, self.position(now)));
        self.direction = Direction::Forward;
    }

    /// Rewind from wherever the playhead is
    pub fn reverse(&mut self, now: Instant) {
        if self.direction == Direction::Backward {
            return;
        }
        self.anchor = Some((now, self.position(now)));
        self.direction = Direction::Backward;
    }

    /// Play on entering the viewport, rewind on leaving it back past the start
    pub fn on_visibility(&mut self, entered: bool, now: Instant) {
        if entered {
            self.play(now);
        } else {
            self.reverse(now);
        }
    }

    /// Whether the timeline has nothing left to animate
    pub fn is_settled(&self, now: Instant) -> bool {
        let position = self.position(now);
        match self.direction {
            Direction::Forward => position >= self.total(),
            Direction::Backward => position.is_zero(),
        }
    }

    /// Frame of glyph `index` at `now`
    pub fn frame(&self, index: usize, now: Instant) -> GlyphFrame {
        let Some(rank) = self.glyphs.get(index).and_then(|g| g.rank) else {
            return GlyphFrame::REST;
        };
        let start = self.delay + self.stagger * rank as u32;
        let position = self.position(now);
        let local = if self.duration.is_zero() {
            if position >= start { 1.0 } else { 0.0 }
        } else {
            let into = position.saturating_sub(start);
            (into.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        self.effect.frame(self.effect.easing().apply(local))
    }

    /// Every glyph with its frame, in text order
    pub fn frames(&self, now: Instant) -> Vec<(char, GlyphFrame)> {
        (0..self.glyphs.len())
            .map(|i| (self.glyphs[i].ch, self.frame(i, now)))
            .collect()
    }
}
