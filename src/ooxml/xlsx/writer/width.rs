//! Column width estimation for auto-sizing.
//!
//! Widths are in "default character" units, the unit of the `width`
//! attribute of a column: the advance of a digit in the workbook's default
//! font. Measuring real glyph outlines needs font files, so the default
//! estimator works from the display width of the text.

use crate::ooxml::xlsx::format::DEFAULT_FONT_SIZE;
use crate::ooxml::xlsx::writer::style::Style;
use unicode_width::UnicodeWidthStr;

/// Width a column gets when nothing overrides it.
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Ratio between a rendered character and the default-character unit.
const CHAR_WIDTH_RATIO: f64 = 0.9;

const BOLD_FACTOR: f64 = 1.1;

/// Measures how wide a column must be to show a text.
pub trait WidthEstimator {
    /// Width of `text` rendered with `style`, in default-character units.
    fn text_width(&self, text: &str, style: Option<&Style>) -> f64;
}

/// Estimator based on Unicode display width.
///
/// Unstyled text takes `0.9` units per display column. Styled text is
/// scaled by font size and weight, and rotated text is measured by the
/// horizontal extent of its rotated box.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWidthEstimator;

impl WidthEstimator for DefaultWidthEstimator {
    fn text_width(&self, text: &str, style: Option<&Style>) -> f64 {
        let columns = text.width() as f64;
        let Some(style) = style else {
            return columns * CHAR_WIDTH_RATIO;
        };

        let (size, bold) = style
            .font()
            .map_or((DEFAULT_FONT_SIZE, false), |font| (font.size, font.bold));
        let mut per_char = CHAR_WIDTH_RATIO * size / DEFAULT_FONT_SIZE;
        if bold {
            per_char *= BOLD_FACTOR;
        }
        let width = columns * per_char;

        match style.rotation() {
            None | Some(0) => width,
            // Stacked text is one character wide.
            Some(270) => {
                let widest = text.chars().map(|c| c.to_string().width()).max().unwrap_or(0);
                widest as f64 * per_char
            },
            Some(degrees) => {
                let theta = f64::from(degrees).to_radians();
                // Line height taken as two characters, as in the usual
                // autosize rule that pads rotated text with leading.
                let line = 2.0 * size / DEFAULT_FONT_SIZE;
                width * theta.cos().abs() + line * theta.sin().abs()
            },
        }
    }
}
