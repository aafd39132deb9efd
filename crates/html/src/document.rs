//! Mutable arena DOM.
//!
//! Invariants:
//! - Every live node is reachable through `live`; removed nodes keep their arena
//!   slot but are dropped from `live`, so stale ids miss on every lookup.
//! - A node has at most one parent and operations never create cycles.
//! - Only `Document` and `Element` nodes carry children.
//! - Attribute order and duplicates are preserved; lookups take the first match.

use crate::types::{Attribute, Id, Node, NodeKind};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} is not live")]
    MissingNode(Id),
    #[error("node id {0:?} is already in use")]
    DuplicateId(Id),
    #[error("node {0:?} cannot have children")]
    InvalidParent(Id),
    #[error("node {0:?} already has a parent")]
    AlreadyParented(Id),
    #[error("node {0:?} has no parent")]
    Detached(Id),
    #[error("appending {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: Id, child: Id },
    #[error("node {0:?} has the wrong kind for this operation")]
    WrongNodeKind(Id),
    #[error("offset {offset} is out of range for node {node:?}")]
    InvalidOffset { node: Id, offset: usize },
    #[error("tree root must be a document node")]
    MissingRoot,
}

#[derive(Clone, Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<Id>,
    children: Vec<Id>,
}

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<NodeRecord>,
    live: HashMap<Id, usize>,
    root: Id,
    next_id: u32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only its root node.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            live: HashMap::new(),
            root: Id::UNASSIGNED,
            next_id: 1,
        };
        doc.root = doc.alloc(NodeKind::Document);
        doc
    }

    /// Load an owned tree into a fresh arena.
    ///
    /// Non-zero ids in the tree are kept as-is; `Id::UNASSIGNED` nodes get
    /// fresh ids above the largest explicit one.
    pub fn from_tree(tree: &Node) -> Result<Self, DomError> {
        let Node::Document { id, children } = tree else {
            return Err(DomError::MissingRoot);
        };

        fn max_id(node: &Node) -> u32 {
            node.children()
                .iter()
                .map(max_id)
                .fold(node.id().0, u32::max)
        }

        let mut doc = Self {
            nodes: Vec::new(),
            live: HashMap::new(),
            root: Id::UNASSIGNED,
            next_id: max_id(tree).saturating_add(1),
        };
        doc.root = doc.claim(*id, NodeKind::Document)?;
        let root = doc.root;
        for child in children {
            doc.load(root, child)?;
        }
        Ok(doc)
    }

    /// Snapshot the live tree back into an owned [`Node`].
    pub fn to_tree(&self) -> Node {
        self.materialize(self.root)
            .unwrap_or(Node::Document {
                id: self.root,
                children: Vec::new(),
            })
    }

    pub fn root(&self) -> Id {
        self.root
    }

    pub fn is_live(&self, id: Id) -> bool {
        self.live.contains_key(&id)
    }

    pub fn kind(&self, id: Id) -> Option<&NodeKind> {
        self.record(id).map(|r| &r.kind)
    }

    pub fn parent(&self, id: Id) -> Option<Id> {
        self.record(id).and_then(|r| r.parent)
    }

    pub fn children(&self, id: Id) -> &[Id] {
        self.record(id).map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    pub fn index_in_parent(&self, id: Id) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub fn element_name(&self, id: Id) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element(&self, id: Id) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element { .. }))
    }

    pub fn is_element_named(&self, id: Id, name: &str) -> bool {
        self.element_name(id)
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    /// Character data of a text or comment node.
    pub fn text(&self, id: Id) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text),
            _ => None,
        }
    }

    pub(crate) fn text_mut(&mut self, id: Id) -> Option<&mut String> {
        match &mut self.record_mut(id)?.kind {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text),
            _ => None,
        }
    }

    pub fn attributes(&self, id: Id) -> &[Attribute] {
        match self.kind(id) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    /// Attribute value by ASCII case-insensitive name. A valueless attribute
    /// reads as `""`.
    pub fn attr(&self, id: Id, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, id: Id, name: &str) -> bool {
        self.attributes(id)
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub fn set_attr(&mut self, id: Id, name: &str, value: impl Into<String>) -> Result<(), DomError> {
        let value = value.into();
        let attributes = self.attributes_mut(id)?;
        match attributes.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = Some(value),
            None => attributes.push((Arc::from(name), Some(value))),
        }
        Ok(())
    }

    /// Returns `true` if an attribute was removed.
    pub fn remove_attr(&mut self, id: Id, name: &str) -> Result<bool, DomError> {
        let attributes = self.attributes_mut(id)?;
        let before = attributes.len();
        attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        Ok(attributes.len() != before)
    }

    pub fn create_element(&mut self, name: &str, attributes: Vec<Attribute>) -> Id {
        self.alloc(NodeKind::Element {
            name: Arc::from(name),
            attributes,
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> Id {
        self.alloc(NodeKind::Text { text: text.into() })
    }

    pub fn append_child(&mut self, parent: Id, child: Id) -> Result<(), DomError> {
        let len = self.children(parent).len();
        self.insert_child(parent, len, child)
    }

    pub fn insert_child(&mut self, parent: Id, index: usize, child: Id) -> Result<(), DomError> {
        let parent_rec = self.live_record(parent)?;
        if !parent_rec.kind.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        if index > parent_rec.children.len() {
            return Err(DomError::InvalidOffset {
                node: parent,
                offset: index,
            });
        }
        if self.live_record(child)?.parent.is_some() {
            return Err(DomError::AlreadyParented(child));
        }
        if parent == child || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }

        if let Some(rec) = self.record_mut(parent) {
            rec.children.insert(index, child);
        }
        if let Some(rec) = self.record_mut(child) {
            rec.parent = Some(parent);
        }
        Ok(())
    }

    /// Unlink a node and its subtree from the tree and drop them from the live set.
    pub fn remove_subtree(&mut self, id: Id) -> Result<(), DomError> {
        if id == self.root {
            return Err(DomError::WrongNodeKind(id));
        }
        self.live_record(id)?;
        self.detach(id);
        self.forget(id);
        Ok(())
    }

    /// Remove every child of `id`.
    pub fn clear_children(&mut self, id: Id) -> Result<(), DomError> {
        let children = self.live_record(id)?.children.clone();
        for child in children {
            self.remove_subtree(child)?;
        }
        Ok(())
    }

    /// Split a text node at `offset`; the tail moves into a new sibling that
    /// directly follows the original. Returns the new node.
    pub fn split_text(&mut self, id: Id, offset: usize) -> Result<Id, DomError> {
        let parent = self.parent(id).ok_or(DomError::Detached(id))?;
        let index = self.index_in_parent(id).ok_or(DomError::Detached(id))?;
        let text = match self.kind(id) {
            Some(NodeKind::Text { text }) => text,
            Some(_) => return Err(DomError::WrongNodeKind(id)),
            None => return Err(DomError::MissingNode(id)),
        };
        if offset > text.len() || !text.is_char_boundary(offset) {
            return Err(DomError::InvalidOffset { node: id, offset });
        }

        let tail = self
            .text_mut(id)
            .map(|t| t.split_off(offset))
            .unwrap_or_default();
        let new_node = self.create_text(tail);
        self.insert_child(parent, index + 1, new_node)?;
        Ok(new_node)
    }

    /// Replace the children of `id` with a single text node (none for empty
    /// text). On a text node the character data is replaced instead.
    pub fn set_text_content(&mut self, id: Id, text: &str) -> Result<(), DomError> {
        if let Some(existing) = self.text_mut(id) {
            existing.clear();
            existing.push_str(text);
            return Ok(());
        }
        self.clear_children(id)?;
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }

    pub fn is_inclusive_ancestor(&self, ancestor: Id, node: Id) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn alloc(&mut self, kind: NodeKind) -> Id {
        let id = Id(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.insert_record(id, kind);
        id
    }

    fn claim(&mut self, id: Id, kind: NodeKind) -> Result<Id, DomError> {
        if id == Id::UNASSIGNED {
            return Ok(self.alloc(kind));
        }
        if self.live.contains_key(&id) {
            return Err(DomError::DuplicateId(id));
        }
        self.insert_record(id, kind);
        Ok(id)
    }

    fn insert_record(&mut self, id: Id, kind: NodeKind) {
        let index = self.nodes.len();
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        });
        self.live.insert(id, index);
    }

    fn load(&mut self, parent: Id, node: &Node) -> Result<(), DomError> {
        let kind = match node {
            Node::Document { id, .. } => return Err(DomError::WrongNodeKind(*id)),
            Node::Element {
                name, attributes, ..
            } => NodeKind::Element {
                name: Arc::clone(name),
                attributes: attributes.clone(),
            },
            Node::Text { text, .. } => NodeKind::Text { text: text.clone() },
            Node::Comment { text, .. } => NodeKind::Comment { text: text.clone() },
        };
        let id = self.claim(node.id(), kind)?;
        self.append_child(parent, id)?;
        for child in node.children() {
            self.load(id, child)?;
        }
        Ok(())
    }

    fn materialize(&self, id: Id) -> Option<Node> {
        let rec = self.record(id)?;
        let children = || {
            rec.children
                .iter()
                .filter_map(|c| self.materialize(*c))
                .collect::<Vec<_>>()
        };
        let node = match &rec.kind {
            NodeKind::Document => Node::Document {
                id,
                children: children(),
            },
            NodeKind::Element { name, attributes } => Node::Element {
                id,
                name: Arc::clone(name),
                attributes: attributes.clone(),
                children: children(),
            },
            NodeKind::Text { text } => Node::Text {
                id,
                text: text.clone(),
            },
            NodeKind::Comment { text } => Node::Comment {
                id,
                text: text.clone(),
            },
        };
        Some(node)
    }

    fn detach(&mut self, id: Id) {
        let Some(parent) = self.record_mut(id).and_then(|r| r.parent.take()) else {
            return;
        };
        if let Some(rec) = self.record_mut(parent) {
            rec.children.retain(|c| *c != id);
        }
    }

    fn forget(&mut self, id: Id) {
        let children = match self.record_mut(id) {
            Some(rec) => std::mem::take(&mut rec.children),
            None => return,
        };
        self.live.remove(&id);
        for child in children {
            self.forget(child);
        }
    }

    fn attributes_mut(&mut self, id: Id) -> Result<&mut Vec<Attribute>, DomError> {
        let rec = self.record_mut(id).ok_or(DomError::MissingNode(id))?;
        match &mut rec.kind {
            NodeKind::Element { attributes, .. } => Ok(attributes),
            _ => Err(DomError::WrongNodeKind(id)),
        }
    }

    fn record(&self, id: Id) -> Option<&NodeRecord> {
        self.live.get(&id).map(|&index| &self.nodes[index])
    }

    fn record_mut(&mut self, id: Id) -> Option<&mut NodeRecord> {
        let index = *self.live.get(&id)?;
        self.nodes.get_mut(index)
    }

    fn live_record(&self, id: Id) -> Result<&NodeRecord, DomError> {
        self.record(id).ok_or(DomError::MissingNode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{doc, elem, text};
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        Document::from_tree(&doc(vec![elem(
            2,
            "div",
            vec![("id", "box")],
            vec![text(3, "hello"), elem(4, "span", vec![], vec![text(5, "!")])],
        )]))
        .unwrap()
    }

    #[test]
    fn from_tree_round_trips_through_to_tree() {
        let tree = doc(vec![elem(2, "p", vec![("class", "a b")], vec![text(3, "x")])]);
        let document = Document::from_tree(&tree).unwrap();
        assert_eq!(document.to_tree(), tree);
    }

    #[test]
    fn from_tree_assigns_ids_above_explicit_ones() {
        let tree = doc(vec![
            elem(7, "p", vec![], vec![]),
            elem(0, "p", vec![], vec![]),
        ]);
        let document = Document::from_tree(&tree).unwrap();
        let children = document.children(document.root());
        assert_eq!(children[0], Id(7));
        assert!(children[1].0 > 7);
    }

    #[test]
    fn from_tree_rejects_duplicate_ids() {
        let tree = doc(vec![elem(2, "p", vec![], vec![]), elem(2, "p", vec![], vec![])]);
        assert_eq!(
            Document::from_tree(&tree).unwrap_err(),
            DomError::DuplicateId(Id(2))
        );
    }

    #[test]
    fn from_tree_requires_document_root() {
        assert_eq!(
            Document::from_tree(&text(1, "x")).unwrap_err(),
            DomError::MissingRoot
        );
    }

    #[test]
    fn removed_nodes_are_no_longer_live() {
        let mut document = sample();
        document.remove_subtree(Id(4)).unwrap();
        assert!(!document.is_live(Id(4)));
        assert!(!document.is_live(Id(5)));
        assert_eq!(document.children(Id(2)), &[Id(3)]);
        assert_eq!(document.parent(Id(5)), None);
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut document = sample();
        let root = document.root();
        assert!(document.remove_subtree(root).is_err());
    }

    #[test]
    fn attributes_are_case_insensitive_and_valueless_reads_empty() {
        let mut document = Document::from_tree(&doc(vec![crate::test_utils::elem_raw(
            2,
            "div",
            vec![(Arc::from("ContentEditable"), None)],
            vec![],
        )]))
        .unwrap();
        assert_eq!(document.attr(Id(2), "contenteditable"), Some(""));
        document.set_attr(Id(2), "hidden", "").unwrap();
        assert!(document.has_attr(Id(2), "HIDDEN"));
        assert!(document.remove_attr(Id(2), "hidden").unwrap());
        assert!(!document.remove_attr(Id(2), "hidden").unwrap());
    }

    #[test]
    fn split_text_moves_tail_into_next_sibling() {
        let mut document = sample();
        let tail = document.split_text(Id(3), 2).unwrap();
        assert_eq!(document.text(Id(3)), Some("he"));
        assert_eq!(document.text(tail), Some("llo"));
        assert_eq!(document.children(Id(2)), &[Id(3), tail, Id(4)]);
    }

    #[test]
    fn split_text_rejects_mid_char_offsets() {
        let mut document = Document::from_tree(&doc(vec![elem(
            2,
            "p",
            vec![],
            vec![text(3, "a€b")],
        )]))
        .unwrap();
        assert!(matches!(
            document.split_text(Id(3), 2),
            Err(DomError::InvalidOffset { .. })
        ));
    }

    #[test]
    fn insert_child_rejects_cycles() {
        let mut document = sample();
        document.remove_subtree(Id(4)).unwrap();
        let outer = document.create_element("div", Vec::new());
        let inner = document.create_element("div", Vec::new());
        document.append_child(outer, inner).unwrap();
        assert_eq!(
            document.append_child(inner, outer),
            Err(DomError::CycleDetected {
                parent: inner,
                child: outer
            })
        );
    }

    #[test]
    fn set_text_content_replaces_children() {
        let mut document = sample();
        document.set_text_content(Id(2), "new").unwrap();
        assert_eq!(document.text_content(Id(2)), "new");
        assert!(!document.is_live(Id(3)));

        document.set_text_content(Id(2), "").unwrap();
        assert!(document.children(Id(2)).is_empty());
    }
}
