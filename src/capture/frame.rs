//! Frame type representing a captured RGB image with metadata.

use std::time::Instant;

/// Number of interleaved channels in a frame (R, G, B).
pub const CHANNELS: usize = 3;

/// A single captured frame from the camera.
///
/// Pixels are stored row-major as interleaved 8-bit RGB. A frame lives for
/// exactly one loop iteration and is dropped before the next read.
#[derive(Clone)]
pub struct Frame {
    /// Interleaved RGB pixel data.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Capture timestamp.
    timestamp: Instant,
    /// Monotonic sequence number.
    sequence: u64,
    /// Text burned into the pixels by the overlay.
    annotations: Vec<String>,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            timestamp: Instant::now(),
            sequence,
            annotations: Vec::new(),
        }
    }

    /// Creates a frame filled with a single colour.
    pub fn filled(width: u32, height: u32, color: [u8; 3], sequence: u64) -> Self {
        let count = (width as usize) * (height as usize);
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&color);
        }
        Self::new(pixels, width, height, sequence)
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Validates that the pixel buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.pixel_count() * CHANNELS
    }

    /// Returns the RGB value at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * CHANNELS;
        self.pixels
            .get(idx..idx + CHANNELS)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Writes one pixel, silently clipping coordinates outside the frame.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * CHANNELS;
        if let Some(px) = self.pixels.get_mut(idx..idx + CHANNELS) {
            px.copy_from_slice(&color);
        }
    }

    /// Text labels drawn onto this frame, in drawing order.
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    pub(crate) fn push_annotation(&mut self, text: &str) {
        self.annotations.push(text.to_owned());
    }

    /// Packs the frame as `0x00RRGGBB` words for window backends.
    pub fn to_argb(&self) -> Vec<u32> {
        self.pixels
            .chunks_exact(CHANNELS)
            .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
            .collect()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .field("annotations", &self.annotations)
            .finish()
    }
}
