//! Text measurement.
//!
//! The layout engine never measures text itself - it talks to a
//! [`TextMeasure`] capability supplied by the host platform. A pixel-based
//! host backs it with real font metrics; for terminals the bundled
//! [`CellMeasure`] counts display cells via `unicode-width`:
//! - ASCII printable: 1 cell
//! - CJK and most emoji: 2 cells (fullwidth)
//! - Control and zero-width characters: 0 cells

use unicode_width::UnicodeWidthChar;

use crate::types::Font;

// =============================================================================
// Measurement capability
// =============================================================================

/// Black-box text measurement supplied by the host platform.
///
/// Implementations must be pure: the same inputs always yield the same
/// dimensions. Content is passed through unmodified - control characters
/// and other oddities are the measurer's problem.
pub trait TextMeasure {
    /// Rendered width of `text` laid out on a single line.
    fn width(&self, text: &str, font: &Font) -> f32;

    /// Rendered height of `text` wrapped at `max_width`.
    fn height(&self, text: &str, font: &Font, max_width: f32) -> f32;
}

// =============================================================================
// Terminal cell measurer
// =============================================================================

/// Measures text in terminal cells, scaled to layout units.
///
/// `cell_width`/`cell_height` translate cell counts into the same units the
/// rest of the layout uses, so pixel-tuned settings keep working on a cell
/// grid. The font descriptor is ignored: a terminal's cell geometry does
/// not depend on the font.
#[derive(Debug, Clone, PartialEq)]
pub struct CellMeasure {
    /// Layout units per terminal column.
    pub cell_width: f32,
    /// Layout units per terminal row.
    pub cell_height: f32,
}

impl Default for CellMeasure {
    fn default() -> Self {
        Self {
            cell_width: 1.0,
            cell_height: 1.0,
        }
    }
}

impl TextMeasure for CellMeasure {
    fn width(&self, text: &str, _font: &Font) -> f32 {
        display_cells(text) as f32 * self.cell_width
    }

    fn height(&self, text: &str, _font: &Font, max_width: f32) -> f32 {
        if self.cell_width <= 0.0 {
            return self.cell_height;
        }
        let columns = (max_width / self.cell_width).floor() as u16;
        wrapped_line_count(text, columns) as f32 * self.cell_height
    }
}

// =============================================================================
// Cell counting
// =============================================================================

/// Measure the display width of a string in terminal cells.
pub fn display_cells(s: &str) -> u16 {
    let mut width = 0u16;
    for c in s.chars() {
        width = width.saturating_add(c.width().unwrap_or(0) as u16);
    }
    width
}

/// Measure the height of text when character-wrapped to a given width.
///
/// Returns the number of lines the text would occupy: minimum 1 for
/// non-empty text, 0 for empty. Explicit newlines always break.
pub fn wrapped_line_count(text: &str, available_width: u16) -> u16 {
    if text.is_empty() {
        return 0;
    }

    if available_width == 0 {
        return 1; // Degenerate case
    }

    let mut lines = 0u16;
    let mut current_line_width = 0u16;

    for c in text.chars() {
        if c == '\n' {
            lines = lines.saturating_add(1);
            current_line_width = 0;
            continue;
        }

        let char_width = c.width().unwrap_or(0) as u16;

        if current_line_width + char_width > available_width && current_line_width > 0 {
            // Wrap to next line
            lines = lines.saturating_add(1);
            current_line_width = char_width;
        } else {
            current_line_width += char_width;
        }
    }

    // Count the final line if it has content
    if current_line_width > 0 || lines == 0 {
        lines = lines.saturating_add(1);
    }

    lines.max(1)
}

// =============================================================================
// Tests
// =============================================================================
