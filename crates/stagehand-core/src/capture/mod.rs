//! Scroll capture for a pinned section
//!
//! While captured, wheel and touch input stop scrolling the page and instead
//! drive a single progress value in [0, 1]. Two panels follow that value in
//! consecutive halves of the gesture: the leading panel slides out first,
//! then the trailing panel. Pushing past either end hands scroll back to the
//! page after a short settle delay.

pub mod arbiter;
pub mod controller;
pub mod input;
pub mod machine;
pub mod progress;

pub use arbiter::{CaptureArbiter, ControllerId};
pub use controller::{CaptureController, CaptureInput, Lifecycle};
pub use input::{TouchTracker, WheelDelta};
pub use machine::{CaptureMachine, CaptureSnapshot, CaptureState, Effect, Outcome};
pub use progress::{move_distance, PanelOffsets, Progress};
