//! Input bridge - crossterm event routing
//!
//! Connects crossterm's event stream to the controller so the widget can
//! be driven from a terminal event loop:
//!
//! - `convert_key_event` - reduce a crossterm KeyEvent to a field key
//! - `TokenField::handle_key_event` - apply a key to the edit field
//! - `TokenField::handle_mouse_event` - route clicks to token taps
//!
//! The controller itself stays platform-neutral; a non-terminal host can
//! ignore this module and call the controller operations directly.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::controller::TokenField;

// =============================================================================
// Key conversion
// =============================================================================

/// The keys the edit field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    /// A printable character to insert.
    Char(char),
    /// Backspace / delete-backward.
    Backspace,
    /// Return / submit.
    Enter,
}

/// Reduce a crossterm KeyEvent to a field key.
///
/// Only `Press` and `Repeat` states map; releases and keys the field does
/// not handle return `None`. Chords with Ctrl or Alt are left to the host.
pub fn convert_key_event(event: &KeyEvent) -> Option<FieldKey> {
    if !matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    if event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match event.code {
        KeyCode::Char(c) => Some(FieldKey::Char(c)),
        KeyCode::Backspace => Some(FieldKey::Backspace),
        KeyCode::Enter => Some(FieldKey::Enter),
        _ => None,
    }
}

// =============================================================================
// Event routing
// =============================================================================

impl TokenField {
    /// Apply a crossterm key event to the edit field.
    ///
    /// Returns true if the event was consumed. Keys are only consumed
    /// while the field has focus.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        let focused = self.field().map(|f| f.focused).unwrap_or(false);
        if !focused {
            return false;
        }

        match convert_key_event(event) {
            Some(FieldKey::Char(c)) => {
                let mut buf = [0u8; 4];
                self.insert_text(c.encode_utf8(&mut buf));
                true
            }
            Some(FieldKey::Backspace) => self.delete_backward(),
            Some(FieldKey::Enter) => {
                self.handle_return();
                true
            }
            None => false,
        }
    }

    /// Route a crossterm mouse event, with coordinates relative to the
    /// widget's origin, to a token tap.
    ///
    /// Returns true if a token was hit.
    pub fn handle_mouse_event(&mut self, event: &MouseEvent) -> bool {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        match self.token_at(event.column as f32, event.row as f32) {
            Some(index) => {
                self.handle_token_tap(index);
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{TokenDataSource, TokenField};
    use crate::settings::TokenFieldSettings;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Items(RefCell<Vec<String>>);

    impl TokenDataSource for Items {
        fn item_count(&self) -> usize {
            self.0.borrow().len()
        }

        fn item_content(&self, index: usize) -> String {
            self.0.borrow().get(index).cloned().unwrap_or_default()
        }

        fn is_editable(&self) -> bool {
            true
        }
    }

    fn make_field(items: &[&str]) -> (TokenField, Rc<Items>) {
        let store = Rc::new(Items(RefCell::new(
            items.iter().map(|s| s.to_string()).collect(),
        )));
        let mut tf = TokenField::new(200.0, 40.0, TokenFieldSettings::default());
        tf.set_datasource(&store);
        tf.reload_data();
        (tf, store)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_key_basics() {
        assert_eq!(
            convert_key_event(&press(KeyCode::Char('a'))),
            Some(FieldKey::Char('a'))
        );
        assert_eq!(
            convert_key_event(&press(KeyCode::Backspace)),
            Some(FieldKey::Backspace)
        );
        assert_eq!(
            convert_key_event(&press(KeyCode::Enter)),
            Some(FieldKey::Enter)
        );
        assert_eq!(convert_key_event(&press(KeyCode::Tab)), None);
        assert_eq!(convert_key_event(&press(KeyCode::Esc)), None);
    }

    #[test]
    fn test_convert_key_ignores_release_and_chords() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Release,
            state: crossterm::event::KeyEventState::NONE,
        };
        assert_eq!(convert_key_event(&release), None);

        let chord = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        assert_eq!(convert_key_event(&chord), None);
    }

    #[test]
    fn test_typing_fills_buffer() {
        let (mut tf, _store) = make_field(&[]);

        assert!(tf.handle_key_event(&press(KeyCode::Char('h'))));
        assert!(tf.handle_key_event(&press(KeyCode::Char('i'))));

        assert_eq!(tf.field().unwrap().text, "hi");
    }

    #[test]
    fn test_keys_ignored_without_focus() {
        let (mut tf, _store) = make_field(&[]);
        tf.resign_field();

        assert!(!tf.handle_key_event(&press(KeyCode::Char('x'))));
        assert_eq!(tf.field().unwrap().text, "");
    }

    #[test]
    fn test_backspace_routes_through_both_paths() {
        let (mut tf, _store) = make_field(&["a", "b"]);

        tf.handle_key_event(&press(KeyCode::Char('z')));
        // Non-empty buffer: edits the buffer.
        assert!(tf.handle_key_event(&press(KeyCode::Backspace)));
        assert_eq!(tf.field().unwrap().text, "");

        // Empty buffer: selects the last token.
        assert!(tf.handle_key_event(&press(KeyCode::Backspace)));
        assert_eq!(tf.selected_token_index(), Some(1));
    }

    #[test]
    fn test_enter_submits() {
        let (mut tf, _store) = make_field(&[]);
        let returned = Rc::new(RefCell::new(Vec::new()));
        let log = returned.clone();
        tf.callbacks.on_should_return =
            Some(Box::new(move |t| log.borrow_mut().push(t.to_string())));

        tf.handle_key_event(&press(KeyCode::Char('t')));
        tf.handle_key_event(&press(KeyCode::Enter));

        assert_eq!(*returned.borrow(), vec!["t".to_string()]);
        assert!(!tf.field().unwrap().focused);
    }

    #[test]
    fn test_mouse_down_taps_token() {
        let (mut tf, _store) = make_field(&["aa", "bb"]);
        let second = tf.tokens()[1].rect;

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: (second.x + 1.0) as u16,
            row: (second.y + 1.0) as u16,
            modifiers: KeyModifiers::empty(),
        };
        assert!(tf.handle_mouse_event(&click));
        assert_eq!(tf.selected_token_index(), Some(1));

        // A click in empty space hits nothing.
        let miss = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 190,
            row: 0,
            modifiers: KeyModifiers::empty(),
        };
        assert!(!tf.handle_mouse_event(&miss));
    }
}
