//! Text labels burned into frames.

use super::font::{glyph_for, text_width, CAP_HEIGHT};
use super::raster::draw_line;
use crate::capture::Frame;

/// Pure green in RGB order.
pub const GREEN: [u8; 3] = [0, 255, 0];

/// A static text label with a fixed placement and style.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    /// Bottom-left corner of the text baseline, in pixels.
    origin: (i32, i32),
    scale: f32,
    color: [u8; 3],
    thickness: u32,
}

impl Label {
    /// Green label at scale 1.0 with 2-pixel strokes.
    pub fn new(text: impl Into<String>, origin: (i32, i32)) -> Self {
        Self {
            text: text.into(),
            origin,
            scale: 1.0,
            color: GREEN,
            thickness: 2,
        }
    }

    /// The `Port: <index>` label shown in the top-left corner.
    pub fn for_port(port: u32) -> Self {
        Self::new(format!("Port: {}", port), (10, 30))
    }

    /// Multiplies the glyph size; 1.0 is a 21-pixel cap height.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the RGB stroke colour.
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    /// Sets the stroke width in pixels, at least 1.
    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness.max(1);
        self
    }

    /// The text drawn.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bottom-left of the baseline.
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// RGB stroke colour.
    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    /// Pixel extent of the rendered text as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        let w = (text_width(&self.text) as f32 * self.scale).round() as u32;
        let h = (CAP_HEIGHT as f32 * self.scale).round() as u32;
        (w, h)
    }

    /// Draws the label into `frame` and records its text on the frame.
    pub fn draw(&self, frame: &mut Frame) {
        let (ox, oy) = self.origin;
        let mut pen_x = 0;

        for c in self.text.chars() {
            let glyph = glyph_for(c);
            for stroke in glyph.strokes {
                for pair in stroke.windows(2) {
                    let from = self.to_screen(ox, oy, pen_x, pair[0]);
                    let to = self.to_screen(ox, oy, pen_x, pair[1]);
                    draw_line(frame, from, to, self.color, self.thickness);
                }
            }
            pen_x += glyph.advance;
        }

        frame.push_annotation(&self.text);
    }

    fn to_screen(&self, ox: i32, oy: i32, pen_x: i32, (gx, gy): (i8, i8)) -> (i32, i32) {
        let x = ((pen_x + gx as i32) as f32 * self.scale).round() as i32;
        let y = (gy as f32 * self.scale).round() as i32;
        (ox + x, oy - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn count_color(frame: &Frame, color: [u8; 3]) -> usize {
        frame
            .pixels()
            .chunks_exact(3)
            .filter(|px| *px == color)
            .count()
    }

    #[test]
    fn test_port_label_defaults() {
        let label = Label::for_port(1);
        assert_eq!(label.text(), "Port: 1");
        assert_eq!(label.origin(), (10, 30));
        assert_eq!(label.color(), GREEN);
        assert_eq!(label.size(), (111, 21));
    }

    #[test]
    fn test_draw_marks_pixels_and_records_text() {
        let mut frame = Frame::filled(200, 60, [0, 0, 0], 1);
        Label::for_port(1).draw(&mut frame);

        assert!(count_color(&frame, GREEN) > 100);
        assert_eq!(frame.annotations(), ["Port: 1"]);
    }

    #[test]
    fn test_draw_stays_near_text_box() {
        let mut frame = Frame::filled(200, 60, [0, 0, 0], 1);
        let label = Label::for_port(4);
        label.draw(&mut frame);

        let (w, h) = label.size();
        // Thickness 2 spreads strokes by one pixel on each side
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.pixel(x, y) == Some(GREEN) {
                    assert!(x + 1 >= 10 && x <= 10 + w + 1, "x={x}");
                    assert!(y + 1 >= 30 - h && y <= 31, "y={y}");
                }
            }
        }
    }

    #[test]
    fn test_label_on_tiny_frame_is_clipped() {
        let mut frame = Frame::filled(8, 8, [0, 0, 0], 1);
        Label::for_port(0).draw(&mut frame);
        assert_eq!(frame.annotations(), ["Port: 0"]);
    }

    #[test]
    fn test_custom_style() {
        let mut frame = Frame::filled(200, 60, [0, 0, 0], 1);
        Label::for_port(2)
            .with_color([255, 0, 0])
            .with_thickness(1)
            .with_scale(0.5)
            .draw(&mut frame);

        assert_eq!(count_color(&frame, GREEN), 0);
        assert!(count_color(&frame, [255, 0, 0]) > 0);
    }

    proptest! {
        #[test]
        fn prop_port_label_contains_index(port in any::<u32>()) {
            let label = Label::for_port(port);
            let expected = format!("Port: {}", port);
            prop_assert_eq!(label.text(), expected.as_str());
            prop_assert!(label.size().0 > 0);
        }
    }
}
