//! # input_core
//!
//! UI-agnostic editing state for plain text fields (`<input>`, `<textarea>`).
//!
//! - [`InputValueStore`]: field values, carets and selections keyed by node id
//! - [`SelectionRange`]: a normalized byte range within a field value
//! - text helpers that keep offsets on UTF-8 boundaries
//!
//! Offsets are UTF-8 byte indices and always sit on character boundaries
//! once they pass through the store.

mod selection;
mod state;
mod store;
mod text;

pub use selection::SelectionRange;
pub use store::InputValueStore;
pub use text::{clamp_to_char_boundary, filter_single_line, normalize_newlines};

/// Newline handling for text inserted into a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineMode {
    /// `<input>`: CR and LF are dropped.
    #[default]
    Single,
    /// `<textarea>`: CRLF and CR become LF.
    Multi,
}
