//! Window-less displays.

use std::collections::HashMap;
use std::time::Duration;

use super::{Display, DisplayError};
use crate::capture::Frame;

/// Display that logs frames instead of drawing them.
///
/// Used when the crate is built without the `display` feature or when a
/// run is started with `--headless`.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    frames_shown: u64,
    destroyed: bool,
}

impl HeadlessDisplay {
    /// A display with nothing shown yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames passed to `show`.
    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }
}

impl Display for HeadlessDisplay {
    fn show(&mut self, title: &str, frame: &Frame) -> Result<(), DisplayError> {
        if !frame.is_valid() {
            return Err(DisplayError::InvalidFrame {
                sequence: frame.sequence(),
            });
        }
        self.frames_shown += 1;
        self.destroyed = false;
        tracing::trace!(
            title,
            sequence = frame.sequence(),
            width = frame.width(),
            height = frame.height(),
            "frame"
        );
        Ok(())
    }

    fn wait_key(&mut self, delay: Duration) -> Option<u32> {
        std::thread::sleep(delay);
        None
    }

    fn destroy_all(&mut self) {
        if !self.destroyed {
            tracing::debug!("headless display closed after {} frames", self.frames_shown);
        }
        self.destroyed = true;
    }
}

/// What a [`RecordingDisplay`] saw for one shown frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownFrame {
    /// Window title the frame was shown under.
    pub title: String,
    /// Frame sequence number.
    pub sequence: u64,
    /// Labels drawn on the frame.
    pub annotations: Vec<String>,
}

/// Test double that records shown frames and replays scripted key presses.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    shown: Vec<ShownFrame>,
    keys: HashMap<usize, u32>,
    close_after: Option<usize>,
    polls: usize,
    destroy_calls: usize,
}

impl RecordingDisplay {
    /// A display that never reports a key and never closes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `code` from the key poll that follows the `frame`-th shown
    /// frame (1-based).
    pub fn press_after(mut self, frame: usize, code: u32) -> Self {
        self.keys.insert(frame, code);
        self
    }

    /// Reports the window as closed once `frame` frames have been shown.
    pub fn close_after(mut self, frame: usize) -> Self {
        self.close_after = Some(frame);
        self
    }

    /// Every frame shown, in order.
    pub fn shown(&self) -> &[ShownFrame] {
        &self.shown
    }

    /// Number of `wait_key` calls.
    pub fn key_polls(&self) -> usize {
        self.polls
    }

    /// Number of `destroy_all` calls.
    pub fn destroy_calls(&self) -> usize {
        self.destroy_calls
    }
}

impl Display for RecordingDisplay {
    fn show(&mut self, title: &str, frame: &Frame) -> Result<(), DisplayError> {
        self.shown.push(ShownFrame {
            title: title.to_owned(),
            sequence: frame.sequence(),
            annotations: frame.annotations().to_vec(),
        });
        Ok(())
    }

    fn wait_key(&mut self, _delay: Duration) -> Option<u32> {
        self.polls += 1;
        self.keys.get(&self.shown.len()).copied()
    }

    fn is_open(&self) -> bool {
        self.close_after.map_or(true, |n| self.shown.len() < n)
    }

    fn destroy_all(&mut self) {
        self.destroy_calls += 1;
    }
}
