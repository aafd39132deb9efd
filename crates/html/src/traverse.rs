use crate::{Document, Id, NodeKind};

/// Pre-order walk over the strict descendants of a node, in document order.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<Id>,
}

impl Iterator for Descendants<'_> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Walk from a node's parent up to the root.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<Id>,
}

impl Iterator for Ancestors<'_> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let id = self.next?;
        self.next = self.doc.parent(id);
        Some(id)
    }
}

impl Document {
    pub fn descendants(&self, id: Id) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    pub fn ancestors(&self, id: Id) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Concatenated text of all descendant text nodes (comments excluded).
    pub fn text_content(&self, id: Id) -> String {
        let mut out = String::new();
        match self.kind(id) {
            Some(NodeKind::Text { text } | NodeKind::Comment { text }) => out.push_str(text),
            Some(_) => {
                for d in self.descendants(id) {
                    if let Some(NodeKind::Text { text }) = self.kind(d) {
                        out.push_str(text);
                    }
                }
            }
            None => {}
        }
        out
    }
}
