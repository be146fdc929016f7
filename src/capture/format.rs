//! Accumulates per-property requests into whole capture formats.
//!
//! Drivers accept a resolution and frame rate as one format. Setting width
//! and height one at a time would hand them an in-between size such as
//! 1280×480, which most UVC devices reject.

use super::CaptureProperty;

/// A complete capture format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatTarget {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
}

/// Requested values not yet seen by the driver.
///
/// A width request is held until the matching height arrives. Height and
/// frame-rate requests yield the full format to apply, filling anything
/// not requested from the device's current format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingFormat {
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<u32>,
}

impl PendingFormat {
    /// Creates an empty set of requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one request and returns the format to apply now, if any.
    pub fn record(
        &mut self,
        property: CaptureProperty,
        value: u32,
        current: FormatTarget,
    ) -> Option<FormatTarget> {
        match property {
            CaptureProperty::FrameWidth => {
                self.width = Some(value);
                None
            }
            CaptureProperty::FrameHeight => {
                self.height = Some(value);
                Some(self.target(current))
            }
            CaptureProperty::Fps => {
                self.fps = Some(value);
                Some(self.target(current))
            }
        }
    }

    fn target(&self, current: FormatTarget) -> FormatTarget {
        FormatTarget {
            width: self.width.unwrap_or(current.width),
            height: self.height.unwrap_or(current.height),
            fps: self.fps.unwrap_or(current.fps),
        }
    }
}
