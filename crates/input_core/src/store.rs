//! Central store for plain-field values, carets and selections.
//!
//! The store does no DOM work: integration layers seed it from element
//! attributes and translate its offsets back into UI state.

use crate::LineMode;
use crate::selection::SelectionRange;
use crate::state::InputState;
use crate::text::{clamp_to_char_boundary, filter_single_line, normalize_newlines};
use html::Id;
use std::collections::HashMap;

/// Central store for plain-field state, keyed by element id.
///
/// # Example
///
/// ```
/// use html::Id;
/// use input_core::{InputValueStore, LineMode, SelectionRange};
///
/// let mut store = InputValueStore::new();
/// let id = Id(3);
///
/// store.ensure_initial(id, "hello".to_string(), LineMode::Single);
/// store.set_selection_range(id, 1, 4);
/// assert_eq!(store.replace_selection(id, "Z"), Some(2));
///
/// assert_eq!(store.get(id), Some("hZo"));
/// assert_eq!(store.selection(id), Some(SelectionRange::collapsed(2)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InputValueStore {
    values: HashMap<Id, InputState>,
}

impl InputValueStore {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Returns `true` if an entry exists for this field.
    pub fn has(&self, id: Id) -> bool {
        self.values.contains_key(&id)
    }

    /// Returns the stored value for this field, if any.
    pub fn get(&self, id: Id) -> Option<&str> {
        self.values.get(&id).map(|s| s.value.as_str())
    }

    /// Monotonic revision counter for the field's value.
    pub fn value_revision(&self, id: Id) -> u64 {
        self.values.get(&id).map(|s| s.value_rev).unwrap_or(0)
    }

    /// Ensure an entry exists; if missing, inserts `initial` with the caret
    /// at its end. Existing entries are left untouched.
    pub fn ensure_initial(&mut self, id: Id, initial: String, mode: LineMode) {
        self.values
            .entry(id)
            .or_insert_with(|| InputState::new(initial, mode));
    }

    /// Overwrite the value; the caret moves to the end and the selection clears.
    ///
    /// Returns `false` if the field has no entry.
    pub fn set(&mut self, id: Id, value: String) -> bool {
        let Some(st) = self.values.get_mut(&id) else {
            return false;
        };
        st.caret = value.len();
        st.value = value;
        st.selection_anchor = None;
        mark_text_dirty(st);
        true
    }

    /// Empty the value and put the caret at offset 0.
    pub fn clear_value(&mut self, id: Id) -> bool {
        self.set(id, String::new())
    }

    /// Current selection, normalized. A caret reads as a collapsed range.
    pub fn selection(&self, id: Id) -> Option<SelectionRange> {
        self.values.get(&id).map(selection_of)
    }

    /// Set the selection; offsets are clamped into the value and onto
    /// character boundaries. `start > end` collapses to `end`, matching
    /// `setSelectionRange`.
    pub fn set_selection_range(&mut self, id: Id, start: usize, end: usize) -> bool {
        let Some(st) = self.values.get_mut(&id) else {
            return false;
        };
        let end = clamp_to_char_boundary(&st.value, end);
        let start = clamp_to_char_boundary(&st.value, start).min(end);
        st.caret = end;
        st.selection_anchor = (start != end).then_some(start);
        true
    }

    /// Replace the current selection (or insert at the caret) with `text`,
    /// normalized for the field's line mode, and collapse the selection right
    /// after it. Returns the new caret, or `None` if the field has no entry.
    ///
    /// Empty text still counts as a mutation: the revision advances and any
    /// selected text is removed.
    pub fn replace_selection(&mut self, id: Id, text: &str) -> Option<usize> {
        let st = self.values.get_mut(&id)?;
        let text = match st.mode {
            LineMode::Single => filter_single_line(text),
            LineMode::Multi => normalize_newlines(text),
        };

        let sel = selection_of(st);
        st.value.replace_range(sel.start..sel.end, &text);
        st.caret = sel.start + text.len();
        st.selection_anchor = None;
        debug_assert!(st.value.is_char_boundary(st.caret));
        mark_text_dirty(st);
        Some(st.caret)
    }

    /// Forget a field, e.g. after its element was removed from the document.
    pub fn remove(&mut self, id: Id) {
        self.values.remove(&id);
    }

    /// Keep only the fields for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(Id) -> bool) {
        self.values.retain(|id, _| keep(*id));
    }

    /// Clear all stored field state.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

fn selection_of(st: &InputState) -> SelectionRange {
    let caret = clamp_to_char_boundary(&st.value, st.caret);
    match st.selection_anchor {
        Some(anchor) => SelectionRange::new(clamp_to_char_boundary(&st.value, anchor), caret),
        None => SelectionRange::collapsed(caret),
    }
}

fn mark_text_dirty(st: &mut InputState) {
    st.value_rev = st.value_rev.wrapping_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(value: &str, mode: LineMode) -> (InputValueStore, Id) {
        let mut store = InputValueStore::new();
        let id = Id(7);
        store.ensure_initial(id, value.to_string(), mode);
        (store, id)
    }

    #[test]
    fn seeded_field_has_caret_at_end() {
        let (store, id) = field("abc", LineMode::Single);
        assert_eq!(store.selection(id), Some(SelectionRange::collapsed(3)));
    }

    #[test]
    fn ensure_initial_does_not_overwrite() {
        let (mut store, id) = field("abc", LineMode::Single);
        store.ensure_initial(id, "zzz".to_string(), LineMode::Single);
        assert_eq!(store.get(id), Some("abc"));
    }

    #[test]
    fn insert_at_caret() {
        let (mut store, id) = field("abcd", LineMode::Single);
        store.set_selection_range(id, 2, 2);
        assert_eq!(store.replace_selection(id, "XY"), Some(4));
        assert_eq!(store.get(id), Some("abXYcd"));
        assert_eq!(store.selection(id), Some(SelectionRange::collapsed(4)));
    }

    #[test]
    fn replace_selected_range() {
        let (mut store, id) = field("hello", LineMode::Single);
        store.set_selection_range(id, 1, 4);
        assert_eq!(store.replace_selection(id, "Z"), Some(2));
        assert_eq!(store.get(id), Some("hZo"));
    }

    #[test]
    fn replacement_matches_slice_formula() {
        let value = "p ∧ q → r";
        let boundaries: Vec<usize> = value
            .char_indices()
            .map(|(i, _)| i)
            .chain([value.len()])
            .collect();
        for &s in &boundaries {
            for &e in boundaries.iter().filter(|e| **e >= s) {
                for text in ["", "¬", "(s ∨ t)"] {
                    let (mut store, id) = field(value, LineMode::Single);
                    store.set_selection_range(id, s, e);
                    let caret = store.replace_selection(id, text).unwrap();
                    let expected = format!("{}{}{}", &value[..s], text, &value[e..]);
                    assert_eq!(store.get(id), Some(expected.as_str()));
                    assert_eq!(caret, s + text.len());
                    assert_eq!(store.selection(id), Some(SelectionRange::collapsed(caret)));
                }
            }
        }
    }

    #[test]
    fn empty_text_still_bumps_revision() {
        let (mut store, id) = field("abc", LineMode::Single);
        let before = store.value_revision(id);
        assert_eq!(store.replace_selection(id, ""), Some(3));
        assert_eq!(store.get(id), Some("abc"));
        assert!(store.value_revision(id) > before);
    }

    #[test]
    fn single_line_strips_newlines_multi_line_normalizes() {
        let (mut single, a) = field("", LineMode::Single);
        single.replace_selection(a, "p\r\nq");
        assert_eq!(single.get(a), Some("pq"));

        let (mut multi, b) = field("", LineMode::Multi);
        multi.replace_selection(b, "p\r\nq\rr");
        assert_eq!(multi.get(b), Some("p\nq\nr"));
        assert_eq!(multi.selection(b), Some(SelectionRange::collapsed(5)));
    }

    #[test]
    fn selection_offsets_are_clamped() {
        let (mut store, id) = field("a∑b", LineMode::Single);
        store.set_selection_range(id, 2, 100);
        assert_eq!(store.selection(id), Some(SelectionRange::new(1, 5)));

        store.set_selection_range(id, 4, 1);
        assert_eq!(store.selection(id), Some(SelectionRange::collapsed(1)));
    }

    #[test]
    fn clear_value_resets_caret() {
        let (mut store, id) = field("abc", LineMode::Multi);
        store.set_selection_range(id, 1, 2);
        assert!(store.clear_value(id));
        assert_eq!(store.get(id), Some(""));
        assert_eq!(store.selection(id), Some(SelectionRange::collapsed(0)));
    }

    #[test]
    fn retain_drops_rejected_fields() {
        let mut store = InputValueStore::new();
        store.ensure_initial(Id(1), "a".to_string(), LineMode::Single);
        store.ensure_initial(Id(2), "b".to_string(), LineMode::Multi);
        store.retain(|id| id != Id(1));
        assert!(!store.has(Id(1)));
        assert_eq!(store.get(Id(2)), Some("b"));
    }

    #[test]
    fn missing_field_is_reported() {
        let mut store = InputValueStore::new();
        assert_eq!(store.replace_selection(Id(1), "x"), None);
        assert!(!store.set_selection_range(Id(1), 0, 0));
        assert!(!store.set(Id(1), "x".to_string()));
        assert!(!store.has(Id(1)));
    }
}
