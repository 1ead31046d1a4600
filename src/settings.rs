//! Token field settings.
//!
//! One immutable bag of options shared read-only by the layout engine and
//! the controller. Defaults match the classic pill look: dark rounded
//! tokens with white labels, selection inverting the two.

use crate::types::{Attr, EdgeInsets, Font, Rgba};

/// Configuration for a token field.
///
/// All numeric fields must be non-negative; [`TokenFieldSettings::sanitized`]
/// enforces this by clamping.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenFieldSettings {
    /// Insets between the container edge and the token area.
    pub margins: EdgeInsets,
    /// Horizontal inset between a pill's edge and its label.
    pub text_margin: f32,
    /// Height of a single-line token row.
    pub token_height: f32,
    /// Horizontal gap between adjacent tokens on a row.
    pub token_x_margin: f32,
    /// Vertical gap between rows.
    pub token_y_margin: f32,
    /// Round the pill ends (corner radius of half the token height).
    pub is_round: bool,
    /// Font for token labels and the edit field.
    pub font: Font,
    /// Text attributes for token labels.
    pub text_attr: Attr,
    /// Caret tint of the edit field.
    pub tint_color: Rgba,
    /// Label color of an unselected token.
    pub text_color: Rgba,
    /// Label color of a selected token.
    pub text_color_selected: Rgba,
    /// Pill background of an unselected token.
    pub background_color: Rgba,
    /// Pill background of a selected token.
    pub background_color_selected: Rgba,
    /// Focus the edit field as soon as data is (re)loaded.
    pub first_responder_at_start: bool,
    /// Whether taps may select tokens at all.
    pub can_select_tokens: bool,
}

impl Default for TokenFieldSettings {
    fn default() -> Self {
        Self {
            margins: EdgeInsets::ZERO,
            text_margin: 16.0,
            token_height: 30.0,
            token_x_margin: 4.0,
            token_y_margin: 4.0,
            is_round: true,
            font: Font::default(),
            text_attr: Attr::NONE,
            tint_color: Rgba::BLACK,
            text_color: Rgba::WHITE,
            text_color_selected: Rgba::rgb(34, 34, 34),
            background_color: Rgba::rgb(34, 34, 34),
            background_color_selected: Rgba::WHITE,
            first_responder_at_start: true,
            can_select_tokens: true,
        }
    }
}

impl TokenFieldSettings {
    /// Return a copy with every numeric field clamped to be non-negative.
    ///
    /// The layout algorithm assumes non-negative metrics; negative margins
    /// or gaps would let cursors run backwards.
    pub fn sanitized(&self) -> Self {
        let mut s = self.clone();
        s.margins.top = s.margins.top.max(0.0);
        s.margins.left = s.margins.left.max(0.0);
        s.margins.bottom = s.margins.bottom.max(0.0);
        s.margins.right = s.margins.right.max(0.0);
        s.text_margin = s.text_margin.max(0.0);
        s.token_height = s.token_height.max(0.0);
        s.token_x_margin = s.token_x_margin.max(0.0);
        s.token_y_margin = s.token_y_margin.max(0.0);
        s.font.size = s.font.size.max(0.0);
        s
    }

    /// Corner radius for pill rendering: half the token height when round,
    /// zero otherwise.
    pub fn corner_radius(&self) -> f32 {
        if self.is_round {
            self.token_height / 2.0
        } else {
            0.0
        }
    }
}
