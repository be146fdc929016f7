//! Capture and display configuration.
//!
//! Width, height and frame rate are requests to the driver. The device
//! may negotiate something else and nothing here promises otherwise.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest frame width or height accepted by [`CaptureConfig::validate`].
pub const MAX_DIMENSION: u32 = 16384;

/// Configuration for camera capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera device index ("port").
    pub port: u32,
    /// Requested frame width in pixels.
    pub width: u32,
    /// Requested frame height in pixels.
    pub height: u32,
    /// Requested frames per second.
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            port: 1,
            width: 1280,
            height: 720,
            fps: 30,
        }
    }
}

impl CaptureConfig {
    /// Creates the default configuration for another device index.
    pub fn for_port(port: u32) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }

    /// Replaces every field that `overrides` sets.
    pub fn with_overrides(mut self, overrides: &CaptureOverrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
        if let Some(fps) = overrides.fps {
            self.fps = fps;
        }
        self
    }
}

/// Capture values given on the command line, taking precedence over the
/// config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureOverrides {
    /// Camera device index.
    pub port: Option<u32>,
    /// Requested frame width.
    pub width: Option<u32>,
    /// Requested frame height.
    pub height: Option<u32>,
    /// Requested frame rate.
    pub fps: Option<u32>,
}

/// Window and keyboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How long each key poll waits, in milliseconds.
    pub key_poll_ms: u64,
    /// Key code (compared against the low 8 bits) that ends the session.
    pub cancel_key: u8,
    /// Window title prefix; the port is appended.
    pub window_title_prefix: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            key_poll_ms: 1,
            cancel_key: 27, // ESC
            window_title_prefix: "ELP Camera".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Window title for the given port, e.g. `ELP Camera - Port 1`.
    pub fn window_title(&self, port: u32) -> String {
        format!("{} - Port {}", self.window_title_prefix, port)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Width or height is zero or above [`MAX_DIMENSION`].
    #[error("invalid frame dimensions (must be 1-16384 pixels)")]
    InvalidDimensions,
    /// Frame rate outside 1..=120.
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// The `[capture]` table.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// The `[display]` table.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Values are not validated here; command-line overrides may still
    /// replace them.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
