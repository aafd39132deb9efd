//! Page model: the document plus the browser state the controls act on.

use crate::events::Event;
use crate::target::{self, Target};
use html::{Document, DomError, DomRange, Id, Node};
use input_core::{InputValueStore, LineMode, normalize_newlines};
use std::collections::VecDeque;

#[derive(Debug)]
pub struct Page {
    doc: Document,
    fields: InputValueStore,
    selection: Option<DomRange>,
    focused: Option<Id>,
    queue: VecDeque<Event>,
}

impl Page {
    /// Wrap a document and seed plain-field state from its markup.
    pub fn new(doc: Document) -> Self {
        let mut page = Self {
            doc,
            fields: InputValueStore::new(),
            selection: None,
            focused: None,
            queue: VecDeque::new(),
        };
        let fields: Vec<Id> = page
            .doc
            .descendants(page.doc.root())
            .filter(|id| target::is_plain_field(&page.doc, *id))
            .collect();
        for id in fields {
            page.ensure_field(id);
        }
        page
    }

    pub fn from_tree(tree: &Node) -> Result<Self, DomError> {
        Ok(Self::new(Document::from_tree(tree)?))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn fields(&self) -> &InputValueStore {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut InputValueStore {
        &mut self.fields
    }

    /// Seed store state for a plain field that has none yet. Returns `false`
    /// if `id` is not a plain field.
    pub fn ensure_field(&mut self, id: Id) -> bool {
        if !target::is_plain_field(&self.doc, id) {
            return false;
        }
        if self.fields.has(id) {
            return true;
        }

        if self.doc.is_element_named(id, "textarea") {
            let mut initial = normalize_newlines(&self.doc.text_content(id)).into_owned();
            // A leading newline right after the start tag is not part of the value.
            if initial.starts_with('\n') {
                initial.remove(0);
            }
            self.fields.ensure_initial(id, initial, LineMode::Multi);
        } else {
            let initial = self.doc.attr(id, "value").unwrap_or("").to_string();
            self.fields.ensure_initial(id, initial, LineMode::Single);
        }
        true
    }

    /// Remove `id` and its subtree from the document, dropping the field
    /// state of any plain field inside it.
    pub fn remove_subtree(&mut self, id: Id) -> Result<(), DomError> {
        self.doc.remove_subtree(id)?;
        self.prune_fields();
        Ok(())
    }

    /// Drop field state for elements no longer in the document.
    pub fn prune_fields(&mut self) {
        let doc = &self.doc;
        self.fields.retain(|id| doc.is_live(id));
    }

    /// Current value of a plain field, or the text content of any other node.
    pub fn target_text(&self, id: Id) -> Option<String> {
        match target::classify(&self.doc, id)? {
            Target::PlainField(_) => match self.fields.get(id) {
                Some(value) => Some(value.to_string()),
                None => Some(self.doc.attr(id, "value").unwrap_or("").to_string()),
            },
            Target::RichRegion(_) | Target::TextBearing(_) => Some(self.doc.text_content(id)),
        }
    }

    /// The document selection used by rich regions.
    pub fn selection(&self) -> Option<DomRange> {
        self.selection
    }

    pub fn set_selection(&mut self, range: Option<DomRange>) {
        self.selection = range;
    }

    /// The focused element, if it is still in the document.
    pub fn focused(&self) -> Option<Id> {
        self.focused.filter(|id| self.doc.is_live(*id))
    }

    /// Move focus to `id`, queueing `focus` and `focusin` when it changes.
    pub fn focus(&mut self, id: Id) {
        if !self.doc.is_element(id) {
            log::debug!(target: "page_controls.page", "focus on non-element {id:?} ignored");
            return;
        }
        if self.focused() == Some(id) {
            return;
        }
        self.focused = Some(id);
        self.dispatch(Event::focus(id));
        self.dispatch(Event::focus_in(id));
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Queue an event for the next [`Dispatcher::run`](crate::Dispatcher::run).
    pub fn dispatch(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn click(&mut self, id: Id) {
        self.dispatch(Event::click(id));
    }

    pub fn key_down(&mut self, id: Id, key: &str) {
        self.dispatch(Event::key_down(id, key));
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn pop_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    pub(crate) fn discard_events(&mut self) {
        self.queue.clear();
    }
}
