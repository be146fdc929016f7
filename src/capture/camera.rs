//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and scripted mock implementations
//! for testing.

use super::{CaptureConfig, Frame, CHANNELS};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// No device answers at this index.
    #[error("camera device not found on port {0}")]
    DeviceNotFound(u32),
    /// The device exists but could not be opened.
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    /// A read failed or the stream ended.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// The camera was used before `open`.
    #[error("camera not initialized")]
    NotInitialized,
}

/// A capture parameter that can be requested from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureProperty {
    /// Frame width in pixels.
    FrameWidth,
    /// Frame height in pixels.
    FrameHeight,
    /// Frames per second.
    Fps,
}

impl std::fmt::Display for CaptureProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CaptureProperty::FrameWidth => "frame width",
            CaptureProperty::FrameHeight => "frame height",
            CaptureProperty::Fps => "fps",
        };
        f.write_str(name)
    }
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait Camera {
    /// Opens the device at `config.port`.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Asks the driver for a capture parameter. Best effort: the outcome
    /// is not reported.
    fn request(&mut self, property: CaptureProperty, value: u32);

    /// Value the device actually settled on, if the backend can tell.
    fn negotiated(&self, property: CaptureProperty) -> Option<u32>;

    /// Reads a single frame.
    fn read(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn release(&mut self);
}

impl<C: Camera + ?Sized> Camera for &mut C {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        (**self).open(config)
    }

    fn request(&mut self, property: CaptureProperty, value: u32) {
        (**self).request(property, value)
    }

    fn negotiated(&self, property: CaptureProperty) -> Option<u32> {
        (**self).negotiated(property)
    }

    fn read(&mut self) -> Result<Frame, CameraError> {
        (**self).read()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

impl<C: Camera + ?Sized> Camera for Box<C> {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        (**self).open(config)
    }

    fn request(&mut self, property: CaptureProperty, value: u32) {
        (**self).request(property, value)
    }

    fn negotiated(&self, property: CaptureProperty) -> Option<u32> {
        (**self).negotiated(property)
    }

    fn read(&mut self) -> Result<Frame, CameraError> {
        (**self).read()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// A call made against a [`MockCamera`], recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraCall {
    /// `open` on the given port.
    Open(u32),
    /// `request` of a property and value.
    Request(CaptureProperty, u32),
    /// `read`, successful or not.
    Read,
    /// `release`, including repeats.
    Release,
}

const MOCK_DEFAULT_WIDTH: u32 = 640;
const MOCK_DEFAULT_HEIGHT: u32 = 480;
/// Largest frame side the mock will allocate.
const MOCK_MAX_DIMENSION: u32 = 4096;

/// Mock camera that generates synthetic frames and records every call.
///
/// Failure points are scripted up front: an unavailable device fails
/// `open`, and `fail_on_read(n)` makes the n-th read (1-based) and every
/// later one fail, as a disconnected device would.
#[derive(Debug, Default)]
pub struct MockCamera {
    unavailable: bool,
    fail_on_read: Option<u64>,
    overrides: Vec<(CaptureProperty, u32)>,
    requested: Vec<(CaptureProperty, u32)>,
    port: Option<u32>,
    reads: u64,
    calls: Vec<CameraCall>,
}

impl MockCamera {
    /// A device that opens and streams until released.
    pub fn new() -> Self {
        Self::default()
    }

    /// A device that cannot be opened.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Makes the `n`-th read (1-based) and all later reads fail.
    pub fn fail_on_read(mut self, n: u64) -> Self {
        self.fail_on_read = Some(n.max(1));
        self
    }

    /// Makes the device report `value` for `property` regardless of the request.
    pub fn with_negotiated(mut self, property: CaptureProperty, value: u32) -> Self {
        self.overrides.push((property, value));
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[CameraCall] {
        &self.calls
    }

    /// Number of times `release` was called.
    pub fn release_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, CameraCall::Release))
            .count()
    }

    /// Number of read attempts, successful or not.
    pub fn read_count(&self) -> u64 {
        self.reads
    }

    fn lookup(list: &[(CaptureProperty, u32)], property: CaptureProperty) -> Option<u32> {
        list.iter()
            .rev()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        self.calls.push(CameraCall::Open(config.port));
        if self.unavailable {
            return Err(CameraError::DeviceNotFound(config.port));
        }
        self.port = Some(config.port);
        self.reads = 0;
        tracing::info!("MockCamera opened on port {}", config.port);
        Ok(())
    }

    fn request(&mut self, property: CaptureProperty, value: u32) {
        self.calls.push(CameraCall::Request(property, value));
        if self.port.is_some() {
            self.requested.push((property, value));
        }
    }

    fn negotiated(&self, property: CaptureProperty) -> Option<u32> {
        self.port?;
        Self::lookup(&self.overrides, property).or_else(|| Self::lookup(&self.requested, property))
    }

    fn read(&mut self) -> Result<Frame, CameraError> {
        self.calls.push(CameraCall::Read);
        if self.port.is_none() {
            return Err(CameraError::NotInitialized);
        }
        self.reads += 1;
        if self.fail_on_read.is_some_and(|n| self.reads >= n) {
            return Err(CameraError::CaptureFailed("mock stream ended".to_string()));
        }

        let width = self
            .negotiated(CaptureProperty::FrameWidth)
            .unwrap_or(MOCK_DEFAULT_WIDTH)
            .min(MOCK_MAX_DIMENSION);
        let height = self
            .negotiated(CaptureProperty::FrameHeight)
            .unwrap_or(MOCK_DEFAULT_HEIGHT)
            .min(MOCK_MAX_DIMENSION);

        // Gradient that shifts with the sequence so consecutive frames differ
        let shift = (self.reads % 256) as u32;
        let mut pixels = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x + shift) % 256) as u8);
                pixels.push(((y + shift) % 256) as u8);
                pixels.push(128);
            }
        }

        Ok(Frame::new(pixels, width, height, self.reads))
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn release(&mut self) {
        self.calls.push(CameraCall::Release);
        if self.port.take().is_some() {
            tracing::info!("MockCamera released");
        }
    }
}
