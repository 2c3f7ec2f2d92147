//! Font metrics used by the built-in backend.
//!
//! Helvetica widths come from the standard AFM file (units per 1000 em) and
//! need no font data. TrueType/OpenType fonts are parsed with ttf-parser.

use std::collections::HashMap;

use super::{Font, TextSize};
use crate::error::FormflowError;

/// Line height as a multiple of font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Helvetica advance widths for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold advance widths for ASCII 32..=126.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

const HELVETICA_DEFAULT_WIDTH: u16 = 556;

/// How the built-in backend measures text.
#[derive(Debug, Clone, Default)]
pub enum Metrics {
    /// Standard Helvetica / Helvetica-Bold AFM widths.
    #[default]
    Helvetica,
    /// Every character advances `advance × font size`; lines are one font
    /// size tall. Handy for hand-checkable geometry.
    Monospace { advance: f64 },
    /// Metrics parsed from a TrueType/OpenType font file.
    TrueType(FontMetrics),
}

impl Metrics {
    pub fn measure(&self, text: &str, font: &Font) -> TextSize {
        match self {
            Metrics::Helvetica => {
                let table = match font.weight {
                    super::FontWeight::Normal => &HELVETICA_WIDTHS,
                    super::FontWeight::Bold => &HELVETICA_BOLD_WIDTHS,
                };
                let units: u32 = text
                    .chars()
                    .map(|ch| {
                        let code = ch as u32;
                        if (32..=126).contains(&code) {
                            table[(code - 32) as usize] as u32
                        } else {
                            HELVETICA_DEFAULT_WIDTH as u32
                        }
                    })
                    .sum();
                TextSize {
                    width: units as f64 / 1000.0 * font.size,
                    height: font.size * LINE_HEIGHT_FACTOR,
                }
            }
            Metrics::Monospace { advance } => TextSize {
                width: text.chars().count() as f64 * advance * font.size,
                height: font.size,
            },
            Metrics::TrueType(metrics) => TextSize {
                width: text.chars().map(|ch| metrics.char_width(ch, font.size)).sum(),
                height: metrics.line_height(font.size),
            },
        }
    }
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}

impl FontMetrics {
    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    pub fn line_height(&self, font_size: f64) -> f64 {
        let units = self.ascender as f64 - self.descender as f64 + self.line_gap as f64;
        units / self.units_per_em as f64 * font_size
    }

    /// Parse metrics from font data using ttf-parser.
    pub fn from_font_data(data: &[u8]) -> Result<Self, FormflowError> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| FormflowError::Font(format!("cannot parse font: {}", e)))?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Ok(FontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        })
    }
}
