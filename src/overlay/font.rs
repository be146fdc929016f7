//! Simplex stroke font.
//!
//! Glyphs are polylines on a grid with the baseline at y = 0, y pointing
//! up and a cap height of 21 units. At scale 1.0 one unit is one pixel.

/// Cap height in font units.
pub const CAP_HEIGHT: i32 = 21;

/// A single glyph: its advance width and the strokes that draw it.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    /// Horizontal distance to the next glyph, in font units.
    pub advance: i32,
    /// Polylines in font units, y up from the baseline.
    pub strokes: &'static [&'static [(i8, i8)]],
}

const fn glyph(advance: i32, strokes: &'static [&'static [(i8, i8)]]) -> Glyph {
    Glyph { advance, strokes }
}

const DOT_HIGH: &[(i8, i8)] = &[(5, 14), (4, 13), (5, 12), (6, 13), (5, 14)];
const DOT_LOW: &[(i8, i8)] = &[(5, 2), (4, 1), (5, 0), (6, 1), (5, 2)];

const SPACE: Glyph = glyph(16, &[]);
const COLON: Glyph = glyph(10, &[DOT_HIGH, DOT_LOW]);
const PERIOD: Glyph = glyph(10, &[DOT_LOW]);
const HYPHEN: Glyph = glyph(20, &[&[(4, 9), (16, 9)]]);

const DIGITS: [Glyph; 10] = [
    glyph(
        20,
        &[&[
            (9, 21), (6, 20), (4, 17), (3, 12), (3, 9), (4, 4), (6, 1), (9, 0), (11, 0),
            (14, 1), (16, 4), (17, 9), (17, 12), (16, 17), (14, 20), (11, 21), (9, 21),
        ]],
    ),
    glyph(20, &[&[(6, 17), (8, 18), (11, 21), (11, 0)]]),
    glyph(
        20,
        &[&[
            (4, 16), (4, 17), (5, 19), (6, 20), (8, 21), (12, 21), (14, 20), (15, 19),
            (16, 17), (16, 15), (15, 13), (13, 10), (3, 0), (17, 0),
        ]],
    ),
    glyph(
        20,
        &[&[
            (5, 21), (16, 21), (10, 13), (13, 13), (15, 12), (16, 11), (17, 8), (17, 6),
            (16, 3), (14, 1), (11, 0), (8, 0), (5, 1), (4, 2), (3, 4),
        ]],
    ),
    glyph(20, &[&[(13, 21), (3, 7), (18, 7)], &[(13, 21), (13, 0)]]),
    glyph(
        20,
        &[&[
            (15, 21), (5, 21), (4, 12), (5, 13), (8, 14), (11, 14), (14, 13), (16, 11),
            (17, 8), (17, 6), (16, 3), (14, 1), (11, 0), (8, 0), (5, 1), (4, 2), (3, 4),
        ]],
    ),
    glyph(
        20,
        &[&[
            (16, 18), (15, 20), (12, 21), (10, 21), (7, 20), (5, 17), (4, 12), (4, 7),
            (5, 3), (7, 1), (10, 0), (11, 0), (14, 1), (16, 3), (17, 6), (17, 7), (16, 10),
            (14, 12), (11, 13), (10, 13), (7, 12), (5, 10), (4, 7),
        ]],
    ),
    glyph(20, &[&[(17, 21), (7, 0)], &[(3, 21), (17, 21)]]),
    glyph(
        20,
        &[&[
            (8, 21), (5, 20), (4, 18), (4, 16), (5, 14), (7, 13), (11, 12), (14, 11),
            (16, 9), (17, 7), (17, 4), (16, 2), (15, 1), (12, 0), (8, 0), (5, 1), (4, 2),
            (3, 4), (3, 7), (4, 9), (6, 11), (9, 12), (13, 13), (15, 14), (16, 16),
            (16, 18), (15, 20), (12, 21), (8, 21),
        ]],
    ),
    glyph(
        20,
        &[&[
            (16, 14), (15, 11), (13, 9), (10, 8), (9, 8), (6, 9), (4, 11), (3, 14), (3, 15),
            (4, 18), (6, 20), (9, 21), (10, 21), (13, 20), (15, 18), (16, 14), (16, 9),
            (15, 4), (13, 1), (10, 0), (8, 0), (5, 1), (4, 3),
        ]],
    ),
];

const UPPER_P: Glyph = glyph(
    21,
    &[
        &[(4, 21), (4, 0)],
        &[
            (4, 21), (13, 21), (16, 20), (17, 19), (18, 17), (18, 14), (17, 12), (16, 11),
            (13, 10), (4, 10),
        ],
    ],
);

const LOWER_O: Glyph = glyph(
    19,
    &[&[
        (8, 14), (6, 13), (4, 11), (3, 8), (3, 6), (4, 3), (6, 1), (8, 0), (11, 0), (13, 1),
        (15, 3), (16, 6), (16, 8), (15, 11), (13, 13), (11, 14), (8, 14),
    ]],
);

const LOWER_R: Glyph = glyph(
    13,
    &[&[(4, 14), (4, 0)], &[(4, 8), (5, 11), (7, 13), (9, 14), (12, 14)]],
);

const LOWER_T: Glyph = glyph(
    12,
    &[&[(5, 21), (5, 4), (6, 1), (8, 0), (10, 0)], &[(2, 14), (9, 14)]],
);

/// Placeholder box drawn for characters without a glyph.
const MISSING: Glyph = glyph(
    16,
    &[&[(3, 0), (3, 21), (13, 21), (13, 0), (3, 0)]],
);

/// Looks up the glyph for `c`.
pub fn glyph_for(c: char) -> Glyph {
    match c {
        ' ' => SPACE,
        ':' => COLON,
        '.' => PERIOD,
        '-' => HYPHEN,
        '0'..='9' => DIGITS[(c as u8 - b'0') as usize],
        'P' => UPPER_P,
        'o' => LOWER_O,
        'r' => LOWER_R,
        't' => LOWER_T,
        _ => MISSING,
    }
}

/// Whether `c` has a real glyph rather than the placeholder box.
pub fn has_glyph(c: char) -> bool {
    matches!(c, ' ' | ':' | '.' | '-' | '0'..='9' | 'P' | 'o' | 'r' | 't')
}

/// Width of `text` in font units.
pub fn text_width(text: &str) -> i32 {
    text.chars().map(|c| glyph_for(c).advance).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_characters_have_glyphs() {
        assert!("Port: 0123456789".chars().all(has_glyph));
        assert!(!has_glyph('Z'));
    }

    #[test]
    fn test_glyphs_stay_inside_advance() {
        for c in "Port: 0123456789.-".chars() {
            let g = glyph_for(c);
            for stroke in g.strokes {
                for &(x, y) in *stroke {
                    assert!((0..=g.advance).contains(&(x as i32)), "{c:?} x={x}");
                    assert!((0..=CAP_HEIGHT).contains(&(y as i32)), "{c:?} y={y}");
                }
            }
        }
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(""), 0);
        assert_eq!(text_width("Port: 1"), 21 + 19 + 13 + 12 + 10 + 16 + 20);
    }
}
