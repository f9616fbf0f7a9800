pub mod capture;
pub mod config;
pub mod error;
pub mod motion;
pub mod platform;
pub mod reveal;
pub mod script;
pub mod smooth;
pub mod visibility;

pub use capture::{CaptureController, CaptureInput, CaptureMachine, Progress};
pub use config::{AppConfig, CaptureConfig, EasingType, SmoothScrollConfig};
pub use error::{Error, Result};
pub use script::{Script, Simulator};
pub use smooth::SmoothScroll;
