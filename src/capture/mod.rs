//! Camera input and frame handling.
//!
//! This module provides abstractions for opening a camera by port index,
//! requesting capture parameters and reading RGB frames.

mod camera;
mod config;
#[cfg(feature = "camera")]
mod device;
mod format;
mod frame;

pub use camera::{Camera, CameraCall, CameraError, CaptureProperty, MockCamera};
pub use config::{
    CaptureConfig, CaptureOverrides, ConfigError, DisplayConfig, FileConfig, MAX_DIMENSION,
};
#[cfg(feature = "camera")]
pub use device::NokhwaCamera;
pub use format::{FormatTarget, PendingFormat};
pub use frame::{Frame, CHANNELS};
