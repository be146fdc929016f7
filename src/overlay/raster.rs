//! Line and disc rasterisation onto RGB frames.

use crate::capture::Frame;

/// Draws a line of the given thickness using Bresenham's algorithm.
///
/// Every step stamps a brush exactly `thickness` pixels across: a square
/// for even thickness, a filled disc for odd. Pixels that fall outside the
/// frame are clipped.
pub fn draw_line(
    frame: &mut Frame,
    (mut x0, mut y0): (i32, i32),
    (x1, y1): (i32, i32),
    color: [u8; 3],
    thickness: u32,
) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        stamp(frame, (x0, y0), thickness, color);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn stamp(frame: &mut Frame, (x, y): (i32, i32), thickness: u32, color: [u8; 3]) {
    let half = (thickness / 2) as i32;
    if thickness <= 1 {
        frame.set_pixel(x, y, color);
    } else if thickness % 2 == 0 {
        // Even widths have no centre pixel; the extra row and column go up-left
        for dy in -half..half {
            for dx in -half..half {
                frame.set_pixel(x + dx, y + dy, color);
            }
        }
    } else {
        draw_filled_circle(frame, (x, y), half, color);
    }
}

/// Draws a filled circle with clipping.
pub fn draw_filled_circle(frame: &mut Frame, (cx, cy): (i32, i32), radius: i32, color: [u8; 3]) {
    let r2 = radius * radius;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                frame.set_pixel(cx + dx, cy + dy, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: [u8; 3] = [0, 255, 0];

    fn lit(frame: &Frame) -> usize {
        (0..frame.height())
            .flat_map(|y| (0..frame.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y) == Some(GREEN))
            .count()
    }

    #[test]
    fn test_horizontal_line() {
        let mut frame = Frame::filled(10, 3, [0, 0, 0], 1);
        draw_line(&mut frame, (1, 1), (8, 1), GREEN, 1);

        assert_eq!(lit(&frame), 8);
        assert_eq!(frame.pixel(0, 1), Some([0, 0, 0]));
        assert_eq!(frame.pixel(8, 1), Some(GREEN));
    }

    #[test]
    fn test_diagonal_line_hits_endpoints() {
        let mut frame = Frame::filled(6, 6, [0, 0, 0], 1);
        draw_line(&mut frame, (5, 0), (0, 5), GREEN, 1);

        assert_eq!(frame.pixel(5, 0), Some(GREEN));
        assert_eq!(frame.pixel(0, 5), Some(GREEN));
        assert_eq!(lit(&frame), 6);
    }

    #[test]
    fn test_thick_line_is_wider() {
        let mut thin = Frame::filled(20, 9, [0, 0, 0], 1);
        let mut thick = Frame::filled(20, 9, [0, 0, 0], 1);
        draw_line(&mut thin, (2, 4), (17, 4), GREEN, 1);
        draw_line(&mut thick, (2, 4), (17, 4), GREEN, 2);

        assert!(lit(&thick) > lit(&thin));
        assert_eq!(thick.pixel(10, 3), Some(GREEN));
        assert_eq!(thick.pixel(10, 4), Some(GREEN));
    }

    #[test]
    fn test_stroke_width_matches_thickness() {
        for thickness in 1..=5u32 {
            let mut frame = Frame::filled(20, 12, [0, 0, 0], 1);
            draw_line(&mut frame, (4, 6), (15, 6), GREEN, thickness);

            let column = (0..frame.height())
                .filter(|&y| frame.pixel(10, y) == Some(GREEN))
                .count();
            assert_eq!(column, thickness as usize, "thickness {}", thickness);
        }

        let mut frame = Frame::filled(20, 9, [0, 0, 0], 1);
        draw_line(&mut frame, (2, 4), (17, 4), GREEN, 2);
        assert_eq!(frame.pixel(10, 5), Some([0, 0, 0]));
        assert_eq!(lit(&frame), 17 * 2);
    }

    #[test]
    fn test_line_clipped_outside_frame() {
        let mut frame = Frame::filled(4, 4, [0, 0, 0], 1);
        draw_line(&mut frame, (-10, -10), (-2, 30), GREEN, 2);
        assert_eq!(lit(&frame), 0);

        draw_line(&mut frame, (-5, 2), (10, 2), GREEN, 1);
        assert_eq!(lit(&frame), 4);
    }
}
