//! Native camera backend built on nokhwa.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, RequestedFormat, RequestedFormatType, Resolution,
};

use super::camera::{Camera, CameraError, CaptureProperty};
use super::{CaptureConfig, FormatTarget, Frame, PendingFormat};

/// A physical camera opened by device index.
#[derive(Default)]
pub struct NokhwaCamera {
    device: Option<nokhwa::Camera>,
    pending: PendingFormat,
    sequence: u64,
}

impl NokhwaCamera {
    /// Creates a camera that is not yet open.
    pub fn new() -> Self {
        Self::default()
    }
}

fn current_format(device: &nokhwa::Camera) -> FormatTarget {
    let resolution = device.resolution();
    FormatTarget {
        width: resolution.width(),
        height: resolution.height(),
        fps: device.frame_rate(),
    }
}

impl std::fmt::Debug for NokhwaCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NokhwaCamera")
            .field("is_open", &self.device.is_some())
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl Camera for NokhwaCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut device = nokhwa::Camera::new(CameraIndex::Index(config.port), requested)
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;
        device
            .open_stream()
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;

        tracing::info!(port = config.port, info = %device.info().human_name(), "camera opened");
        self.device = Some(device);
        self.pending = PendingFormat::new();
        self.sequence = 0;
        Ok(())
    }

    fn request(&mut self, property: CaptureProperty, value: u32) {
        let Some(device) = self.device.as_mut() else {
            return;
        };
        let Some(target) = self.pending.record(property, value, current_format(device)) else {
            tracing::debug!("holding {} = {} until the height is requested", property, value);
            return;
        };

        // Closest lets the driver pick its nearest supported format
        let format = CameraFormat::new(
            Resolution::new(target.width, target.height),
            device.frame_format(),
            target.fps,
        );
        let request = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));
        match device.set_camera_requset(request) {
            Ok(applied) => tracing::debug!("requested {:?}, driver chose {:?}", target, applied),
            Err(e) => tracing::debug!("driver did not accept {:?}: {}", target, e),
        }
    }

    fn negotiated(&self, property: CaptureProperty) -> Option<u32> {
        let device = self.device.as_ref()?;
        Some(match property {
            CaptureProperty::FrameWidth => device.resolution().width(),
            CaptureProperty::FrameHeight => device.resolution().height(),
            CaptureProperty::Fps => device.frame_rate(),
        })
    }

    fn read(&mut self) -> Result<Frame, CameraError> {
        let device = self.device.as_mut().ok_or(CameraError::NotInitialized)?;
        let buffer = device
            .frame()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;

        self.sequence += 1;
        let (width, height) = decoded.dimensions();
        Ok(Frame::new(decoded.into_raw(), width, height, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }

    fn release(&mut self) {
        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.stop_stream() {
                tracing::warn!("failed to stop camera stream: {}", e);
            }
            tracing::info!("camera released");
        }
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        self.release();
    }
}
