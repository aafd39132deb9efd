//! Document-level listeners for symbol, clear and copy controls.
//!
//! Controls are found by delegation: the closest ancestor-or-self of the
//! event target that matches the control selector.

use crate::clipboard::Clipboard;
use crate::config::Selectors;
use crate::events::{Event, EventKind, Listener};
use crate::focus::LastFocused;
use crate::insert;
use crate::page::Page;
use crate::resolve;
use html::{Document, DomError, Id, decode_entities};
use std::rc::Rc;

/// Text a symbol control inserts: `data-symbol` when non-empty, else the
/// control's text, trimmed and entity-decoded. `None` when nothing is left.
pub fn symbol_payload(doc: &Document, control: Id) -> Option<String> {
    let raw = match doc.attr(control, "data-symbol") {
        Some(symbol) if !symbol.is_empty() => symbol.to_string(),
        _ => doc.text_content(control),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(decode_entities(trimmed).into_owned())
}

/// Inserts the payload of a clicked symbol control into its resolved target.
#[derive(Debug)]
pub struct SymbolControls {
    selectors: Rc<Selectors>,
    last: LastFocused,
}

impl SymbolControls {
    pub fn new(selectors: Rc<Selectors>, last: LastFocused) -> Self {
        Self { selectors, last }
    }
}

impl Listener for SymbolControls {
    fn handle_event(&mut self, page: &mut Page, event: &Event) {
        if event.kind != EventKind::Click {
            return;
        }
        let doc = page.document();
        let Some(control) = doc.closest(event.target, &self.selectors.symbol_control) else {
            return;
        };
        let Some(symbol) = symbol_payload(doc, control) else {
            log::debug!(target: "page_controls.controls", "symbol control {control:?} has no payload");
            return;
        };
        let Some(resolution) = resolve::resolve_insert_target(doc, control, &self.last, &self.selectors) else {
            return;
        };
        insert::insert(page, resolution.target, &symbol);
    }
}

/// Empties the resolved target of a clicked clear control.
#[derive(Debug)]
pub struct ClearControls {
    selectors: Rc<Selectors>,
}

impl ClearControls {
    pub fn new(selectors: Rc<Selectors>) -> Self {
        Self { selectors }
    }
}

impl Listener for ClearControls {
    fn handle_event(&mut self, page: &mut Page, event: &Event) {
        if event.kind != EventKind::Click {
            return;
        }
        let doc = page.document();
        let Some(control) = doc.closest(event.target, &self.selectors.clear_control) else {
            return;
        };
        let Some(resolution) = resolve::resolve_clear_target(doc, control, &self.selectors) else {
            return;
        };
        insert::clear(page, resolution.target);
    }
}

/// Writes the trimmed text of a clicked copy control to the clipboard.
pub struct CopyControls {
    selectors: Rc<Selectors>,
    clipboard: Box<dyn Clipboard>,
}

impl CopyControls {
    pub fn new(selectors: Rc<Selectors>, clipboard: Box<dyn Clipboard>) -> Self {
        Self { selectors, clipboard }
    }
}

impl Listener for CopyControls {
    fn handle_event(&mut self, page: &mut Page, event: &Event) {
        if event.kind != EventKind::Click {
            return;
        }
        let doc = page.document();
        let Some(control) = doc.closest(event.target, &self.selectors.copy_control) else {
            return;
        };
        let content = doc.text_content(control);
        let text = content.trim();
        if text.is_empty() {
            return;
        }
        if let Err(err) = self.clipboard.write_text(text) {
            log::warn!(target: "page_controls.controls", "copy from {control:?} failed: {err}");
        }
    }
}

impl std::fmt::Debug for CopyControls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyControls").finish_non_exhaustive()
    }
}

/// Re-dispatches Enter and Space on a control as a click on that control.
#[derive(Debug)]
pub struct KeyboardActivation {
    selectors: Rc<Selectors>,
}

impl KeyboardActivation {
    pub fn new(selectors: Rc<Selectors>) -> Self {
        Self { selectors }
    }

    fn control_for(&self, doc: &Document, target: Id) -> Option<Id> {
        [
            &self.selectors.symbol_control,
            &self.selectors.clear_control,
            &self.selectors.copy_control,
        ]
        .into_iter()
        .filter_map(|selector| doc.closest(target, selector))
        // The innermost control wins when controls nest.
        .max_by_key(|id| doc.ancestors(*id).count())
    }
}

impl Listener for KeyboardActivation {
    fn handle_event(&mut self, page: &mut Page, event: &Event) {
        let EventKind::KeyDown { key } = &event.kind else {
            return;
        };
        if key != "Enter" && key != " " {
            return;
        }
        if let Some(control) = self.control_for(page.document(), event.target) {
            log::trace!(target: "page_controls.controls", "key {key:?} activates {control:?}");
            page.click(control);
        }
    }
}

/// Mark clear and copy controls as keyboard-reachable buttons: `role` is set
/// to `button` and a missing `tabindex` becomes `0`.
pub fn mark_keyboard_controls(page: &mut Page, selectors: &Selectors) {
    let doc = page.document();
    let root = doc.root();
    let mut controls = doc.query_selector_all(root, &selectors.clear_control);
    controls.extend(doc.query_selector_all(root, &selectors.copy_control));

    let doc = page.document_mut();
    for id in controls {
        if let Err(err) = mark_button(doc, id) {
            log::debug!(target: "page_controls.controls", "could not mark {id:?}: {err}");
        }
    }
}

fn mark_button(doc: &mut Document, id: Id) -> Result<(), DomError> {
    doc.set_attr(id, "role", "button")?;
    if !doc.has_attr(id, "tabindex") {
        doc.set_attr(id, "tabindex", "0")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::test_utils::{doc, elem, text};
    use pretty_assertions::assert_eq;

    #[test]
    fn payload_prefers_data_symbol_then_text() {
        let document = Document::from_tree(&doc(vec![
            elem(2, "button", vec![("data-symbol", " &rarr; ")], vec![text(3, "ignored")]),
            elem(4, "button", vec![("data-symbol", "")], vec![text(5, "  ∧ ")]),
            elem(6, "button", vec![], vec![text(7, "   ")]),
            elem(8, "button", vec![("data-symbol", "&amp;lt;")], vec![]),
        ]))
        .unwrap();

        assert_eq!(symbol_payload(&document, Id(2)).as_deref(), Some("→"));
        assert_eq!(symbol_payload(&document, Id(4)).as_deref(), Some("∧"));
        assert_eq!(symbol_payload(&document, Id(6)), None);
        assert_eq!(symbol_payload(&document, Id(8)).as_deref(), Some("&lt;"));
    }
}
