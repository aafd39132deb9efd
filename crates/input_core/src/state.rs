//! Internal per-field state stored in the InputValueStore.

use crate::LineMode;

#[derive(Clone, Debug)]
pub(crate) struct InputState {
    /// The current text value.
    pub value: String,

    /// Monotonic revision counter, incremented on any value mutation.
    pub value_rev: u64,

    /// How inserted text is normalized: `<input>` strips newlines,
    /// `<textarea>` normalizes them to LF.
    pub mode: LineMode,

    /// Caret position as a byte index into `value` (always on a UTF-8 char boundary).
    pub caret: usize,

    /// Selection anchor as a byte index into `value` (UTF-8 char boundary).
    ///
    /// When `Some(anchor)`, the selection range is `min(anchor, caret)..max(anchor, caret)`.
    pub selection_anchor: Option<usize>,
}

impl InputState {
    pub fn new(value: String, mode: LineMode) -> Self {
        let caret = value.len();
        Self {
            value,
            value_rev: 0,
            mode,
            caret,
            selection_anchor: None,
        }
    }
}
