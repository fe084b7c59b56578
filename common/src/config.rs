//! Application configuration.

use serde::{Deserialize, Serialize};

use crate::camera::CameraFacing;

/// Top-level configuration for the gallery application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Key under which the serialized gallery is stored
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Log level name (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    /// How long a toast stays on screen
    #[serde(default = "default_toast_duration")]
    pub toast_duration_ms: u32,

    /// Maximum number of images in the recent carousel (None = all)
    #[serde(default)]
    pub recent_limit: Option<usize>,
}

/// Stream request hints. Browsers treat these as ideals, not guarantees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,

    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,

    #[serde(default = "default_facing")]
    pub default_facing: CameraFacing,

    /// Fallback before a stream is considered live without a readiness event
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_capture_mime")]
    pub mime_type: String,

    /// Lossy encoder quality in 0.0..=1.0
    #[serde(default = "default_capture_quality")]
    pub quality: f64,
}

fn default_storage_key() -> String {
    "capturedImages".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_toast_duration() -> u32 {
    4000
}

fn default_ideal_width() -> u32 {
    1920
}

fn default_ideal_height() -> u32 {
    1080
}

fn default_aspect_ratio() -> f64 {
    16.0 / 9.0
}

fn default_facing() -> CameraFacing {
    CameraFacing::Environment
}

fn default_ready_timeout() -> u32 {
    3000
}

fn default_capture_mime() -> String {
    "image/jpeg".to_string()
}

fn default_capture_quality() -> f64 {
    0.9
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            log_level: default_log_level(),
            camera: CameraConfig::default(),
            capture: CaptureConfig::default(),
            toast_duration_ms: default_toast_duration(),
            recent_limit: None,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            aspect_ratio: default_aspect_ratio(),
            default_facing: default_facing(),
            ready_timeout_ms: default_ready_timeout(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            mime_type: default_capture_mime(),
            quality: default_capture_quality(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON document, falling back to defaults on any error.
    pub fn from_json_or_default(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Failed to parse config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            log::warn!("Unknown log level '{}', using info", self.log_level);
            log::LevelFilter::Info
        })
    }
}
