//! # tokenfield
//!
//! Self-sizing token input widget for terminal UIs.
//!
//! Lays out pill-shaped tokens that wrap across rows inside a container,
//! followed by an inline editable field, and grows the container height to
//! fit. Rendering stays with the host: this crate computes placements and
//! runs the selection/edit state machine, reporting everything through
//! optional callbacks.
//!
//! ## Architecture
//!
//! Three layers, leaf-first:
//!
//! ```text
//! TextMeasure (host capability) → compute_flow (pure layout) → TokenField (state)
//! ```
//!
//! - [`measure`] - black-box text measurement, with a terminal-cell default
//! - [`layout`] - shelf-packing flow layout, a pure function per pass
//! - [`controller`] - token list, edit field, exclusive selection, events
//! - [`input`] - crossterm key/mouse routing for terminal hosts
//!
//! Everything runs synchronously on the caller's thread; a data change
//! triggers a full relayout (no incremental diffing - correctness, not
//! speed, is the contract).
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use tokenfield::{TokenField, TokenFieldSettings};
//!
//! let store = Rc::new(my_store);   // implements TokenDataSource
//! let mut field = TokenField::new(80.0, 3.0, TokenFieldSettings::default());
//! field.set_datasource(&store);
//! field.callbacks.on_token_will_delete = Some(Box::new(move |i| {
//!     // remove item i from the store
//! }));
//! field.reload_data();
//! ```

pub mod controller;
pub mod input;
pub mod layout;
pub mod measure;
pub mod settings;
pub mod types;

// Re-export commonly used items
pub use types::{Attr, EdgeInsets, Font, Rect, Rgba};

pub use settings::TokenFieldSettings;

pub use measure::{CellMeasure, TextMeasure, display_cells, wrapped_line_count};

pub use layout::{FlowLayout, TokenPlacement, compute_flow};

pub use controller::{
    EditField, FieldState, Token, TokenDataSource, TokenField, TokenFieldCallbacks,
};

pub use input::{FieldKey, convert_key_event};
