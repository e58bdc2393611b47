//! Text measurement for the transcript layout.
//!
//! Widths come from the Adobe core-font metrics of Helvetica and Helvetica-Bold,
//! the built-in fonts the PDF backend draws with. Letters beyond ASCII (Latin-1,
//! Vietnamese and other scripts) are measured with an average glyph width and
//! combining marks take no width. Anything else, such as control characters or
//! symbols, has no metric, and measuring it is an error the layout recovers from.

use anyhow::bail;
use serde::{Deserialize, Serialize};

const PT_TO_MM: f64 = 25.4 / 72.0;

/// Average glyph width, used for letters outside the ASCII tables.
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

pub trait TextMeasure {
    /// Width of `text` in millimetres at `size` points.
    fn text_width(&self, text: &str, size: f64, weight: FontWeight) -> anyhow::Result<f64>;
}

/// Character widths for 0x20..=0x7E in 1/1000 em.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl HelveticaMetrics {
    fn glyph_width(ch: char, weight: FontWeight) -> Option<u16> {
        let table = match weight {
            FontWeight::Normal => &HELVETICA,
            FontWeight::Bold => &HELVETICA_BOLD,
        };
        match ch as u32 {
            code @ 0x20..=0x7E => Some(table[(code - 0x20) as usize]),
            0xA0..=0xFF => Some(FALLBACK_WIDTH),
            0x0300..=0x036F => Some(0),
            0x2010..=0x2027 => Some(FALLBACK_WIDTH),
            _ if ch.is_alphanumeric() => Some(FALLBACK_WIDTH),
            _ => None,
        }
    }
}

impl TextMeasure for HelveticaMetrics {
    fn text_width(&self, text: &str, size: f64, weight: FontWeight) -> anyhow::Result<f64> {
        let mut units = 0u32;
        for ch in text.chars() {
            match Self::glyph_width(ch, weight) {
                Some(width) => units += u32::from(width),
                None => bail!("no {weight:?} Helvetica metric for {ch:?} (U+{:04X})", ch as u32),
            }
        }
        Ok(f64::from(units) / 1000.0 * size * PT_TO_MM)
    }
}
