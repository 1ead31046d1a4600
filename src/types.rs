//! Core types for tokenfield.
//!
//! These types define the foundation that everything builds on.
//! They flow from the layout engine through the controller and define
//! what a renderer needs to paint a token field.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Check if color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

// =============================================================================
// Text Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Edge insets around the token container.
///
/// All fields are expected to be non-negative; `TokenFieldSettings::sanitized`
/// clamps violations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Insets of zero on every edge.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Combined vertical inset (top + bottom).
    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Combined horizontal inset (left + right).
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

/// An axis-aligned rectangle. Positions are relative to the token
/// container's margin origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (x + width).
    #[inline]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (y + height).
    #[inline]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Whether the point lies inside the rectangle.
    ///
    /// The left/top edges are inclusive, right/bottom exclusive, so two
    /// rects that abut do not both claim the shared edge.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.max_x() && y >= self.y && y < self.max_y()
    }
}

// =============================================================================
// Font
// =============================================================================

/// Font descriptor passed through to the measurement capability.
///
/// The widget never interprets this itself - a pixel-based measurer uses
/// it to pick real glyph metrics, while the terminal-cell measurer ignores
/// it (cell geometry does not depend on the font).
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Family name, `None` for the platform default.
    pub family: Option<String>,
    /// Point size.
    pub size: f32,
}

impl Font {
    pub fn system(size: f32) -> Self {
        Self { family: None, size }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(12.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constructors() {
        let c = Rgba::rgb(34, 34, 34);
        assert_eq!(c.a, 255);
        assert!(c.is_opaque());
        assert_eq!(Rgba::new(1, 2, 3, 4), Rgba { r: 1, g: 2, b: 3, a: 4 });
    }

    #[test]
    fn test_attr_combination() {
        let a = Attr::BOLD | Attr::UNDERLINE;
        assert!(a.contains(Attr::BOLD));
        assert!(!a.contains(Attr::ITALIC));
        assert_eq!(Attr::default(), Attr::NONE);
    }

    #[test]
    fn test_edge_insets_sums() {
        let m = EdgeInsets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(m.vertical(), 4.0);
        assert_eq!(m.horizontal(), 6.0);
        assert_eq!(EdgeInsets::ZERO.vertical(), 0.0);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 5.0, 20.0, 10.0);
        assert!(r.contains(10.0, 5.0));
        assert!(r.contains(29.9, 14.9));
        assert!(!r.contains(30.0, 5.0));
        assert!(!r.contains(9.9, 5.0));
        assert_eq!(r.max_x(), 30.0);
        assert_eq!(r.max_y(), 15.0);
    }

    #[test]
    fn test_font_default() {
        let f = Font::default();
        assert_eq!(f.size, 12.0);
        assert!(f.family.is_none());
    }
}
