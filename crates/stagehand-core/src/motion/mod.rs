//! Animation primitives shared by the capture controller, the smooth
//! scroller and text reveals.
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (power-N ease-out, exponential)
//! - `timing` - Progress and interpolation against an injected clock
//!
//! ## L3 Molecular Layer
//! - `tween` - Keyed tween engine with overwrite semantics

// L4 Atomic Layer
pub mod easing;
pub mod timing;

// L3 Molecular Layer
pub mod tween;

pub use easing::{EasingType, EasingTypeExt};
pub use tween::TweenEngine;
