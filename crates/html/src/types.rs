use std::sync::Arc;

pub type NodeId = u32;

/// Stable identity of a node inside a [`Document`](crate::Document).
///
/// Ids are never reused within one document, so a stored `Id` behaves like a
/// weak reference: once the node is removed, [`Document::is_live`](crate::Document::is_live)
/// reports `false` and every lookup misses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

impl Id {
    /// Reserved sentinel for "unassigned". Trees handed to
    /// [`Document::from_tree`](crate::Document::from_tree) may use it to ask
    /// for a freshly allocated id.
    pub const UNASSIGNED: Id = Id(0);
}

pub type Attribute = (Arc<str>, Option<String>);

/// Owned node tree, used to seed a document and to snapshot it back out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Document {
        id: Id,
        children: Vec<Node>,
    },
    Element {
        id: Id,
        name: Arc<str>,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
    Text {
        id: Id,
        text: String,
    },
    Comment {
        id: Id,
        text: String,
    },
}

impl Node {
    pub fn id(&self) -> Id {
        match self {
            Node::Document { id, .. } => *id,
            Node::Element { id, .. } => *id,
            Node::Text { id, .. } => *id,
            Node::Comment { id, .. } => *id,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            _ => &[],
        }
    }
}

/// Per-node payload stored in the document arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element {
        name: Arc<str>,
        attributes: Vec<Attribute>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl NodeKind {
    pub fn allows_children(&self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element { .. })
    }
}
