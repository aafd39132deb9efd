//! Node-tree builders for tests.

use crate::{Attribute, Id, Node};
use std::sync::Arc;

pub fn doc(children: Vec<Node>) -> Node {
    Node::Document {
        id: Id(1),
        children,
    }
}

pub fn elem(id: u32, name: &str, attributes: Vec<(&str, &str)>, children: Vec<Node>) -> Node {
    let attributes = attributes
        .into_iter()
        .map(|(k, v)| (Arc::from(k), Some(v.to_string())))
        .collect();
    elem_raw(id, name, attributes, children)
}

pub fn elem_raw(id: u32, name: &str, attributes: Vec<Attribute>, children: Vec<Node>) -> Node {
    Node::Element {
        id: Id(id),
        name: Arc::from(name),
        attributes,
        children,
    }
}

pub fn text(id: u32, text: &str) -> Node {
    Node::Text {
        id: Id(id),
        text: text.to_string(),
    }
}
