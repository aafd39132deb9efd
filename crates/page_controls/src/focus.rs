//! Last-focused target tracking.

use crate::events::{Event, EventKind, Listener};
use crate::page::Page;
use crate::target;
use html::{Document, Id};
use std::cell::Cell;
use std::rc::Rc;

/// Shared handle to the most recently focused eligible target.
///
/// Starts empty and is overwritten on every qualifying focus; it is never
/// cleared. The stored id acts as a weak reference: [`LastFocused::live`]
/// drops it once the node leaves the document or stops being eligible.
#[derive(Clone, Debug, Default)]
pub struct LastFocused(Rc<Cell<Option<Id>>>);

impl LastFocused {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw recorded id, which may be stale.
    pub fn get(&self) -> Option<Id> {
        self.0.get()
    }

    /// The recorded id if it still names a live, eligible target.
    pub fn live(&self, doc: &Document) -> Option<Id> {
        self.get()
            .filter(|id| doc.is_live(*id) && target::is_eligible(doc, *id))
    }

    fn set(&self, id: Id) {
        self.0.set(Some(id));
    }
}

/// Capture-phase listener that records eligible `focusin` targets.
#[derive(Debug)]
pub struct FocusTracker {
    last: LastFocused,
}

impl FocusTracker {
    pub fn new(last: LastFocused) -> Self {
        Self { last }
    }
}

impl Listener for FocusTracker {
    fn handle_event(&mut self, page: &mut Page, event: &Event) {
        if event.kind != EventKind::FocusIn {
            return;
        }
        if target::is_eligible(page.document(), event.target) {
            log::trace!(target: "page_controls.focus", "last focused = {:?}", event.target);
            self.last.set(event.target);
        }
    }
}
