use crate::config::Selectors;
use crate::events::{Event, EventKind, Listener};
use crate::page::Page;
use html::{Document, DomError, Id};
use std::rc::Rc;

/// Hides a group's clear controls while its target is empty.
///
/// Listens for `input` notifications; the notified target's clear group
/// (closest ancestor matching the clear group selector) has each clear control
/// gain `hidden` when the target is empty and lose it otherwise. Targets
/// outside any group are ignored.
#[derive(Debug)]
pub struct VisibilityToggles {
    selectors: Rc<Selectors>,
}

impl VisibilityToggles {
    pub fn new(selectors: Rc<Selectors>) -> Self {
        Self { selectors }
    }

    /// Bring every group in the document in line with its target.
    pub fn sync_all(&self, page: &mut Page) {
        let doc = page.document();
        let targets: Vec<Id> = doc
            .query_selector_all(doc.root(), &self.selectors.clear_group)
            .into_iter()
            .filter_map(|group| doc.query_selector(group, &self.selectors.clear_targets))
            .collect();
        for target in targets {
            self.sync(page, target);
        }
    }

    /// Update the clear controls around `target`.
    pub fn sync(&self, page: &mut Page, target: Id) {
        let Some(group) = page.document().closest(target, &self.selectors.clear_group) else {
            return;
        };
        let empty = page.target_text(target).is_none_or(|text| text.is_empty());
        let controls = page
            .document()
            .query_selector_all(group, &self.selectors.clear_control);

        let doc = page.document_mut();
        for control in controls {
            if let Err(err) = set_hidden(doc, control, empty) {
                log::debug!(target: "page_controls.visibility", "toggle of {control:?} failed: {err}");
            }
        }
    }
}

fn set_hidden(doc: &mut Document, id: Id, hidden: bool) -> Result<(), DomError> {
    if hidden {
        doc.set_attr(id, "hidden", "")
    } else {
        doc.remove_attr(id, "hidden").map(|_| ())
    }
}

impl Listener for VisibilityToggles {
    fn handle_event(&mut self, page: &mut Page, event: &Event) {
        if event.kind == EventKind::Input {
            self.sync(page, event.target);
        }
    }
}
