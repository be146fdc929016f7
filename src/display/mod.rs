//! Frame presentation and keyboard polling.
//!
//! A [`Display`] shows annotated frames in a titled window and reports key
//! presses as 8-bit-compatible key codes, so the capture loop can compare
//! them against a cancel key without knowing the window backend.

mod headless;
#[cfg(feature = "display")]
mod window;

use std::time::Duration;

use crate::capture::Frame;

pub use headless::{HeadlessDisplay, RecordingDisplay, ShownFrame};
#[cfg(feature = "display")]
pub use window::WindowDisplay;

/// Key code of the Escape key.
pub const KEY_ESCAPE: u32 = 27;

/// Errors raised by display backends.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// The backend could not open a window.
    #[error("failed to create window: {0}")]
    WindowCreation(String),
    /// The window rejected the frame buffer.
    #[error("failed to present frame: {0}")]
    Present(String),
    /// The pixel buffer does not match the frame's dimensions.
    #[error("frame {sequence} has an inconsistent pixel buffer")]
    InvalidFrame {
        /// Sequence number of the offending frame.
        sequence: u64,
    },
}

/// Trait for display backends.
pub trait Display {
    /// Shows `frame` in the window named `title`, creating it on first use.
    fn show(&mut self, title: &str, frame: &Frame) -> Result<(), DisplayError>;

    /// Waits up to `delay` for a key press and returns its code.
    fn wait_key(&mut self, delay: Duration) -> Option<u32>;

    /// False once the user has closed the window.
    fn is_open(&self) -> bool {
        true
    }

    /// Closes every window this display created.
    fn destroy_all(&mut self);
}

impl<D: Display + ?Sized> Display for &mut D {
    fn show(&mut self, title: &str, frame: &Frame) -> Result<(), DisplayError> {
        (**self).show(title, frame)
    }

    fn wait_key(&mut self, delay: Duration) -> Option<u32> {
        (**self).wait_key(delay)
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn destroy_all(&mut self) {
        (**self).destroy_all()
    }
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn show(&mut self, title: &str, frame: &Frame) -> Result<(), DisplayError> {
        (**self).show(title, frame)
    }

    fn wait_key(&mut self, delay: Duration) -> Option<u32> {
        (**self).wait_key(delay)
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn destroy_all(&mut self) {
        (**self).destroy_all()
    }
}
