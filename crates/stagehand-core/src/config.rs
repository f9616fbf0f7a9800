use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub smooth_scroll: SmoothScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Easing curve used by tweens and the smooth scroller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump to the end value when the duration elapses
    None,
    Linear,
    /// power1.out
    Quad,
    /// power2.out
    #[default]
    Cubic,
    /// power3.out
    Quartic,
    /// power4.out
    Quintic,
    /// Exponential ease-out (expo.out)
    EaseOut,
    /// power1.inOut
    QuadInOut,
}

/// Tuning for the scroll-captured card stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Progress gained per pixel of wheel delta
    #[serde(default = "default_wheel_sensitivity")]
    pub wheel_sensitivity: f64,
    /// Progress gained per pixel of touch travel
    #[serde(default = "default_touch_sensitivity")]
    pub touch_sensitivity: f64,
    /// Delay between reaching a boundary and handing scroll back to the page
    #[serde(default = "default_release_delay")]
    pub release_delay_ms: u64,
    /// Move distance as a multiple of the viewport width
    #[serde(default = "default_move_distance_factor")]
    pub move_distance_factor: f64,
    /// Distance from 0 or 1 that counts as "reached the end"
    #[serde(default = "default_boundary_epsilon")]
    pub boundary_epsilon: f64,
    /// Visible fraction of the section required to capture scroll
    #[serde(default = "default_activation_ratio")]
    pub activation_ratio: f64,
    /// Duration of each panel tween
    #[serde(default = "default_panel_tween")]
    pub panel_tween_ms: u64,
    /// Easing of each panel tween
    #[serde(default)]
    pub panel_easing: EasingType,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            wheel_sensitivity: default_wheel_sensitivity(),
            touch_sensitivity: default_touch_sensitivity(),
            release_delay_ms: default_release_delay(),
            move_distance_factor: default_move_distance_factor(),
            boundary_epsilon: default_boundary_epsilon(),
            activation_ratio: default_activation_ratio(),
            panel_tween_ms: default_panel_tween(),
            panel_easing: EasingType::Cubic,
        }
    }
}

impl CaptureConfig {
    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }

    pub fn panel_tween_duration(&self) -> Duration {
        Duration::from_millis(self.panel_tween_ms)
    }
}

/// Page-level smooth scrolling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothScrollConfig {
    /// Enable smooth wheel scrolling (disabled = instant jumps)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Time for the page to settle after a wheel event
    #[serde(default = "default_smooth_duration")]
    pub duration_ms: u64,
    #[serde(default = "default_smooth_easing")]
    pub easing: EasingType,
    /// Multiplier applied to every wheel delta
    #[serde(default = "default_wheel_multiplier")]
    pub wheel_multiplier: f64,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            duration_ms: default_smooth_duration(),
            easing: default_smooth_easing(),
            wheel_multiplier: default_wheel_multiplier(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while something is animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Pixels represented by one terminal column
    #[serde(default = "default_cell_width")]
    pub cell_width_px: f64,
    /// Pixels represented by one terminal row
    #[serde(default = "default_cell_height")]
    pub cell_height_px: f64,
    #[serde(default)]
    pub reveal: RevealConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            cell_width_px: default_cell_width(),
            cell_height_px: default_cell_height(),
            reveal: RevealConfig::default(),
        }
    }
}

impl UiConfig {
    pub fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }
}

/// Character reveal timing for headings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default)]
    pub delay_ms: u64,
    /// Offset between consecutive glyphs
    #[serde(default = "default_stagger")]
    pub stagger_ms: u64,
    /// Duration of a single glyph's animation
    #[serde(default = "default_reveal_duration")]
    pub duration_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            stagger_ms: default_stagger(),
            duration_ms: default_reveal_duration(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stagehand")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_wheel_sensitivity() -> f64 {
    0.002
}

fn default_touch_sensitivity() -> f64 {
    0.003 // a swipe covers fewer pixels than the equivalent wheel gesture
}

fn default_release_delay() -> u64 {
    150
}

fn default_move_distance_factor() -> f64 {
    1.2
}

fn default_boundary_epsilon() -> f64 {
    0.01
}

fn default_activation_ratio() -> f64 {
    0.9
}

fn default_panel_tween() -> u64 {
    400
}

fn default_smooth_duration() -> u64 {
    1200
}

fn default_smooth_easing() -> EasingType {
    EasingType::EaseOut
}

fn default_wheel_multiplier() -> f64 {
    1.0
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_cell_width() -> f64 {
    10.0
}

fn default_cell_height() -> f64 {
    20.0
}

fn default_stagger() -> u64 {
    42
}

fn default_reveal_duration() -> u64 {
    1000
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from an explicit path, defaults when it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/stagehand/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("stagehand")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("stagehand.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
