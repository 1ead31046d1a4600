//! Token input controller.
//!
//! [`TokenField`] owns the widget state: the token list rebuilt on every
//! reload, the persistent edit-field buffer, and the exclusive selection.
//! It queries the host through a weak [`TokenDataSource`] reference, runs
//! the flow layout engine, and reports everything else as optional
//! callbacks - it never mutates the host's collection itself. Deletes and
//! submits are intent events; the controller stays consistent even when
//! the host ignores one.
//!
//! Interaction model (the backspace dance):
//! - Backspace in a non-empty buffer edits the buffer, unless a token is
//!   selected, in which case it deletes that token instead.
//! - Backspace in an empty buffer selects the last token first; a second
//!   backspace deletes it.

use std::ops::Range;
use std::rc::{Rc, Weak};

use unicode_segmentation::UnicodeSegmentation;

use crate::layout::compute_flow;
use crate::measure::{CellMeasure, TextMeasure};
use crate::settings::TokenFieldSettings;
use crate::types::{Rect, Rgba};

// =============================================================================
// Data source capability
// =============================================================================

/// Host-supplied item collection. Held weakly by the controller; a missing
/// or dropped source degrades to zero items and not editable.
pub trait TokenDataSource {
    /// Number of items to render as tokens.
    fn item_count(&self) -> usize;
    /// Content string for the item at `index`.
    fn item_content(&self, index: usize) -> String;
    /// Whether the trailing edit field should exist.
    fn is_editable(&self) -> bool;
}

// =============================================================================
// Callbacks
// =============================================================================

/// Event callbacks fired by the controller.
///
/// Every member is independently optional; invoking an unset callback is a
/// no-op, not a fault.
#[derive(Default)]
pub struct TokenFieldCallbacks {
    /// Container height grew during a layout pass (running height).
    pub on_height_changed: Option<Box<dyn FnMut(f32)>>,
    /// A token was placed during reload - customization hook.
    pub on_token_rendered: Option<Box<dyn FnMut(&Token)>>,
    /// The edit field gained focus.
    pub on_editing_began: Option<Box<dyn FnMut(&str)>>,
    /// Return pressed with the current buffer text.
    pub on_should_return: Option<Box<dyn FnMut(&str)>>,
    /// The buffer is about to change; receives the projected text.
    pub on_text_changed: Option<Box<dyn FnMut(&str)>>,
    /// The host should remove the item at this index.
    pub on_token_will_delete: Option<Box<dyn FnMut(usize)>>,
    /// A token was tapped into the selected state.
    pub on_token_tapped: Option<Box<dyn FnMut(usize)>>,
}

// =============================================================================
// Token and edit field
// =============================================================================

/// One placed pill. Created fresh on every reload and replaced wholesale on
/// the next - there is no cross-pass identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Stable position in the data source.
    pub index: usize,
    /// Label text.
    pub content: String,
    /// Frame relative to the margin origin.
    pub rect: Rect,
    /// Row the token sits on.
    pub line: usize,
    /// Wrapped text lines inside the token.
    pub line_count: usize,
    selected: bool,
    selection_animated: bool,
}

impl Token {
    /// Whether this token holds the (exclusive) selection.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether a renderer should animate the most recent selection change.
    pub fn selection_animated(&self) -> bool {
        self.selection_animated
    }

    /// Pill background for the current selection state.
    pub fn background(&self, settings: &TokenFieldSettings) -> Rgba {
        if self.selected {
            settings.background_color_selected
        } else {
            settings.background_color
        }
    }

    /// Label color for the current selection state.
    pub fn text_color(&self, settings: &TokenFieldSettings) -> Rgba {
        if self.selected {
            settings.text_color_selected
        } else {
            settings.text_color
        }
    }

    fn set_selected(&mut self, selected: bool, animated: bool) {
        self.selected = selected;
        self.selection_animated = animated;
    }
}

/// The trailing editable field. Persists across reloads while the source
/// stays editable; the buffer is only cleared by [`TokenField::added_token_data`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditField {
    /// Current text buffer.
    pub text: String,
    /// Frame relative to the margin origin.
    pub rect: Rect,
    /// Whether the field has keyboard focus.
    pub focused: bool,
}

/// Coarse interaction state, derived from focus and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// No focus, no selection.
    Idle,
    /// The edit field has focus.
    Editing,
    /// Exactly one token holds the selection.
    TokenSelected,
}

// =============================================================================
// Controller
// =============================================================================

/// The token field controller. See the module docs for the interaction
/// model.
pub struct TokenField {
    settings: TokenFieldSettings,
    datasource: Option<Weak<dyn TokenDataSource>>,
    /// Event sinks; set members directly.
    pub callbacks: TokenFieldCallbacks,
    measure: Box<dyn TextMeasure>,
    width: f32,
    initial_height: f32,
    container_height: f32,
    tokens: Vec<Token>,
    field: Option<EditField>,
    editing: bool,
}

impl TokenField {
    /// Create a controller for a container of the given frame. `height` is
    /// captured as the initial single-row height that every reload resets
    /// to before growing.
    pub fn new(width: f32, height: f32, settings: TokenFieldSettings) -> Self {
        let mut this = Self {
            settings: settings.sanitized(),
            datasource: None,
            callbacks: TokenFieldCallbacks::default(),
            measure: Box::new(CellMeasure::default()),
            width,
            initial_height: height,
            container_height: height,
            tokens: Vec::new(),
            field: None,
            editing: false,
        };
        this.reload_data();
        this
    }

    /// Attach the host data source. Held weakly; call [`Self::reload_data`]
    /// afterwards to pick it up.
    pub fn set_datasource<S: TokenDataSource + 'static>(&mut self, source: &Rc<S>) {
        let weak: Weak<S> = Rc::downgrade(source);
        self.datasource = Some(weak);
    }

    /// Replace the measurement backend (terminal cells by default).
    pub fn set_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = measure;
    }

    /// Replace the settings. Takes effect on the next reload.
    pub fn set_settings(&mut self, settings: TokenFieldSettings) {
        self.settings = settings.sanitized();
    }

    /// Resize the container width. Takes effect on the next reload.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn settings(&self) -> &TokenFieldSettings {
        &self.settings
    }

    /// Current container height, including growth from wrapped rows.
    pub fn height(&self) -> f32 {
        self.container_height
    }

    /// Tokens from the most recent reload, in data-source order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The edit field, present while the source reports editable.
    pub fn field(&self) -> Option<&EditField> {
        self.field.as_ref()
    }

    /// Index of the selected token, if any. At most one token is ever
    /// selected.
    pub fn selected_token_index(&self) -> Option<usize> {
        self.tokens.iter().find(|t| t.selected).map(|t| t.index)
    }

    /// Derived interaction state.
    pub fn state(&self) -> FieldState {
        if self.selected_token_index().is_some() {
            FieldState::TokenSelected
        } else if self.editing {
            FieldState::Editing
        } else {
            FieldState::Idle
        }
    }

    /// Hit-test a point in container coordinates against the tokens.
    pub fn token_at(&self, x: f32, y: f32) -> Option<usize> {
        let mx = x - self.settings.margins.left;
        let my = y - self.settings.margins.top;
        self.tokens
            .iter()
            .find(|t| t.rect.contains(mx, my))
            .map(|t| t.index)
    }

    fn source(&self) -> Option<Rc<dyn TokenDataSource>> {
        self.datasource.as_ref().and_then(Weak::upgrade)
    }

    fn is_editable(&self) -> bool {
        self.source().map(|s| s.is_editable()).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Reload
    // -------------------------------------------------------------------------

    /// Re-query the data source, recompute the flow layout, and rebuild the
    /// token list wholesale.
    ///
    /// State is swapped in at the end of the pass, so a nested reload
    /// triggered from a callback is simply last-writer-wins. Selection does
    /// not survive a reload; the edit-field buffer and focus do.
    pub fn reload_data(&mut self) {
        let source = self.source();
        let editable = source.as_ref().map(|s| s.is_editable()).unwrap_or(false);
        let count = source.as_ref().map(|s| s.item_count()).unwrap_or(0);
        let contents: Vec<String> = match source.as_ref() {
            Some(s) => (0..count).map(|i| s.item_content(i)).collect(),
            None => Vec::new(),
        };

        let layout = compute_flow(
            &contents,
            &self.settings,
            self.width,
            self.initial_height,
            editable,
            self.measure.as_ref(),
        );

        let mut tokens = Vec::with_capacity(layout.placements.len());
        for (placement, content) in layout.placements.iter().zip(contents) {
            let token = Token {
                index: placement.index,
                content,
                rect: placement.rect,
                line: placement.line,
                line_count: placement.line_count,
                selected: false,
                selection_animated: false,
            };
            if let Some(cb) = self.callbacks.on_token_rendered.as_mut() {
                cb(&token);
            }
            tokens.push(token);
        }

        for height in &layout.height_events {
            if let Some(cb) = self.callbacks.on_height_changed.as_mut() {
                cb(*height);
            }
        }

        self.tokens = tokens;
        self.container_height = layout.container_height;

        if editable {
            let rect = layout.field.unwrap_or_default();
            match self.field.as_mut() {
                // Existing field keeps its buffer and focus, only moves.
                Some(field) => field.rect = rect,
                None => {
                    self.field = Some(EditField {
                        text: String::new(),
                        rect,
                        focused: false,
                    })
                }
            }
            if self.settings.first_responder_at_start {
                self.focus_field();
            }
        } else {
            self.field = None;
            self.set_editing(false);
        }
    }

    /// The host appended the submitted item to its store: clear the buffer
    /// and reload.
    pub fn added_token_data(&mut self) {
        if let Some(field) = self.field.as_mut() {
            field.text.clear();
        }
        self.reload_data();
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// Give the edit field keyboard focus. Fires `on_editing_began` once
    /// per transition; a no-op without a field or when already focused.
    pub fn focus_field(&mut self) {
        let text = match self.field.as_mut() {
            Some(field) if !field.focused => {
                field.focused = true;
                field.text.clone()
            }
            _ => return,
        };
        if let Some(cb) = self.callbacks.on_editing_began.as_mut() {
            cb(&text);
        }
        self.set_editing(true);
    }

    /// Drop keyboard focus and leave the editing state.
    pub fn resign_field(&mut self) {
        if let Some(field) = self.field.as_mut() {
            field.focused = false;
        }
        self.set_editing(false);
    }

    /// Leaving the editing state clears every selection, without animation.
    fn set_editing(&mut self, editing: bool) {
        if !editing {
            for token in &mut self.tokens {
                token.set_selected(false, false);
            }
        }
        self.editing = editing;
    }

    // -------------------------------------------------------------------------
    // Keystrokes
    // -------------------------------------------------------------------------

    /// Gate a proposed buffer edit, mirroring a text field's
    /// should-change-characters hook.
    ///
    /// A deletion while a token is selected turns into "delete that token":
    /// emits `on_token_will_delete`, reloads, and rejects the edit so the
    /// buffer is untouched. A malformed range is accepted untouched with no
    /// event. Otherwise emits `on_text_changed` with the projected text and
    /// accepts - the caller applies the edit.
    pub fn should_change_text(&mut self, range: Range<usize>, replacement: &str) -> bool {
        let Some(text) = self.field.as_ref().map(|f| f.text.clone()) else {
            return true;
        };
        if range.start > range.end
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            return true;
        }

        let deleting = replacement.is_empty() && !range.is_empty();
        if deleting {
            if let Some(index) = self.selected_token_requesting_focus() {
                self.delete_token(index);
                return false;
            }
        }

        let mut projected = text;
        projected.replace_range(range, replacement);
        if let Some(cb) = self.callbacks.on_text_changed.as_mut() {
            cb(&projected);
        }
        true
    }

    /// Backspace pressed while the buffer is empty: a selected token is
    /// deleted; otherwise the last token becomes selected (animated) and
    /// nothing is deleted yet.
    pub fn backspace_on_empty(&mut self) {
        let Some(text) = self.field.as_ref().map(|f| f.text.clone()) else {
            return;
        };
        if !text.is_empty() {
            return;
        }

        if let Some(index) = self.selected_token_requesting_focus() {
            self.delete_token(index);
        } else if let Some(token) = self.tokens.last_mut() {
            token.set_selected(true, true);
        }
    }

    /// Return pressed: report the buffer text and resign focus.
    pub fn handle_return(&mut self) {
        let text = self
            .field
            .as_ref()
            .map(|f| f.text.clone())
            .unwrap_or_default();
        if let Some(cb) = self.callbacks.on_should_return.as_mut() {
            cb(&text);
        }
        self.resign_field();
    }

    /// Append text to the buffer, routing through
    /// [`Self::should_change_text`] first. Returns whether it was applied.
    pub fn insert_text(&mut self, replacement: &str) -> bool {
        let Some(len) = self.field.as_ref().map(|f| f.text.len()) else {
            return false;
        };
        if !self.should_change_text(len..len, replacement) {
            return false;
        }
        if let Some(field) = self.field.as_mut() {
            field.text.push_str(replacement);
        }
        true
    }

    /// Delete one grapheme cluster from the end of the buffer, or run the
    /// empty-buffer path when nothing is left. Returns whether the key was
    /// consumed.
    pub fn delete_backward(&mut self) -> bool {
        let Some(text) = self.field.as_ref().map(|f| f.text.clone()) else {
            return false;
        };
        if text.is_empty() {
            self.backspace_on_empty();
            return true;
        }

        let start = text
            .grapheme_indices(true)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        if !self.should_change_text(start..text.len(), "") {
            // Rejected: the keystroke deleted a selected token instead.
            return true;
        }
        if let Some(field) = self.field.as_mut() {
            field.text.truncate(start);
        }
        true
    }

    // -------------------------------------------------------------------------
    // Taps
    // -------------------------------------------------------------------------

    /// Toggle the selection of the token at `index`.
    ///
    /// A tap that selects fires `on_token_tapped` and requests field focus
    /// when editable; every other token is cleared on every tap, keeping
    /// the selection exclusive. Ignored when selection is disabled or the
    /// index is out of range.
    pub fn handle_token_tap(&mut self, index: usize) {
        if !self.settings.can_select_tokens {
            return;
        }
        let Some(position) = self.tokens.iter().position(|t| t.index == index) else {
            return;
        };

        let now_selected = !self.tokens[position].selected;
        self.tokens[position].set_selected(now_selected, true);

        if now_selected {
            if let Some(cb) = self.callbacks.on_token_tapped.as_mut() {
                cb(index);
            }
            if self.is_editable() {
                self.focus_field();
            }
        }

        for token in &mut self.tokens {
            if token.index != index && token.selected {
                token.set_selected(false, false);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Deletion
    // -------------------------------------------------------------------------

    /// Find the selected token and, as a side effect, pull focus back to
    /// the field when editable (the selection is about to be acted on).
    fn selected_token_requesting_focus(&mut self) -> Option<usize> {
        let index = self.selected_token_index()?;
        if self.is_editable() {
            self.focus_field();
        }
        Some(index)
    }

    /// Emit the delete intent and reload. The host owns the actual removal;
    /// if it ignores the event the reload simply shows the same items.
    fn delete_token(&mut self, index: usize) {
        if index >= self.tokens.len() {
            return;
        }
        if let Some(cb) = self.callbacks.on_token_will_delete.as_mut() {
            cb(index);
        }
        self.reload_data();
    }
}

// =============================================================================
// Tests
// =============================================================================
