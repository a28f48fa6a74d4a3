//! Text measurement.
//!
//! Layout asks a [`TextMeasurer`] how wide a run of text is. The built-in
//! [`StandardFonts`] measurer carries the advance widths of the PDF base-14
//! Helvetica faces, so no font files are needed.

/// Font faces available to the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
}

impl FontFace {
    pub const ALL: [FontFace; 3] = [FontFace::Regular, FontFace::Bold, FontFace::Oblique];

    /// PDF base font name.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
            FontFace::Oblique => "Helvetica-Oblique",
        }
    }

    /// Resource name used in page content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
            FontFace::Oblique => "F3",
        }
    }
}

/// Measures rendered text width in points.
pub trait TextMeasurer: Send + Sync {
    fn measure(&self, text: &str, face: FontFace, size: f32) -> f32;
}

/// Advance widths (1/1000 em) for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for characters outside the table.
const MISSING_WIDTH: u16 = 556;

/// Metrics for the Helvetica family. Oblique shares the regular widths.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFonts;

impl StandardFonts {
    fn char_width(face: FontFace, ch: char) -> u16 {
        let table = match face {
            FontFace::Bold => &HELVETICA_BOLD_WIDTHS,
            FontFace::Regular | FontFace::Oblique => &HELVETICA_WIDTHS,
        };
        let code = ch as u32;
        if (0x20..=0x7E).contains(&code) {
            table[(code - 0x20) as usize]
        } else if ch == '\u{00A0}' {
            table[0]
        } else {
            MISSING_WIDTH
        }
    }
}

impl TextMeasurer for StandardFonts {
    fn measure(&self, text: &str, face: FontFace, size: f32) -> f32 {
        let units: u32 = text.chars().map(|ch| Self::char_width(face, ch) as u32).sum();
        units as f32 * size / 1000.0
    }
}
