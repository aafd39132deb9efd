//! Boundary points and ranges over a [`Document`].
//!
//! A boundary point inside a text or comment node counts UTF-8 bytes of its
//! character data; inside an element or the document it counts children.

use crate::{Document, DomError, Id, NodeKind};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryPoint {
    pub node: Id,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: Id, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A start/end pair of boundary points. `start` is expected not to follow `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomRange {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

impl DomRange {
    pub fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

impl Document {
    /// Character count of data nodes, child count otherwise.
    pub fn node_length(&self, id: Id) -> Option<usize> {
        match self.kind(id)? {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text.len()),
            _ => Some(self.children(id).len()),
        }
    }

    pub fn is_valid_point(&self, point: BoundaryPoint) -> bool {
        match self.kind(point.node) {
            Some(NodeKind::Text { text } | NodeKind::Comment { text }) => {
                text.is_char_boundary(point.offset)
            }
            Some(_) => point.offset <= self.children(point.node).len(),
            None => false,
        }
    }

    /// The point just after the last child of `container`.
    pub fn end_of_contents(&self, container: Id) -> Option<BoundaryPoint> {
        Some(BoundaryPoint::new(container, self.node_length(container)?))
    }

    /// The point in `node`'s parent directly after `node`.
    pub fn point_after(&self, node: Id) -> Option<BoundaryPoint> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        Some(BoundaryPoint::new(parent, index + 1))
    }

    /// Tree-order comparison of two boundary points. `None` when either point
    /// is invalid.
    pub fn compare_points(&self, a: BoundaryPoint, b: BoundaryPoint) -> Option<Ordering> {
        Some(self.point_key(a)?.cmp(&self.point_key(b)?))
    }

    /// Returns `true` if both endpoints sit inside `container` (inclusive).
    pub fn range_is_within(&self, range: &DomRange, container: Id) -> bool {
        self.is_inclusive_ancestor(container, range.start.node)
            && self.is_inclusive_ancestor(container, range.end.node)
    }

    /// Delete everything between the range endpoints and return the point the
    /// range collapses to. Partially selected text is trimmed; partially
    /// selected elements stay in place.
    pub fn delete_range_contents(&mut self, range: &DomRange) -> Result<BoundaryPoint, DomError> {
        let DomRange { start, end } = *range;
        let start_key = self.point_key(start).ok_or(DomError::InvalidOffset {
            node: start.node,
            offset: start.offset,
        })?;
        let end_key = self.point_key(end).ok_or(DomError::InvalidOffset {
            node: end.node,
            offset: end.offset,
        })?;
        if start_key >= end_key {
            return Ok(start);
        }

        if start.node == end.node {
            if let Some(text) = self.text_mut(start.node) {
                text.drain(start.offset..end.offset);
            } else {
                let doomed = self.children(start.node)[start.offset..end.offset].to_vec();
                for child in doomed {
                    self.remove_subtree(child)?;
                }
            }
            return Ok(start);
        }

        // Nodes whose whole extent lies between the endpoints, outermost only.
        let mut contained: Vec<Id> = Vec::new();
        for id in self.descendants(self.root()) {
            if contained.iter().any(|c| self.is_inclusive_ancestor(*c, id)) {
                continue;
            }
            let (Some(parent), Some(index)) = (self.parent(id), self.index_in_parent(id)) else {
                continue;
            };
            let (Some(before), Some(after)) = (
                self.point_key(BoundaryPoint::new(parent, index)),
                self.point_key(BoundaryPoint::new(parent, index + 1)),
            ) else {
                continue;
            };
            if start_key <= before && after <= end_key {
                contained.push(id);
            }
        }

        log::trace!(
            target: "html.range",
            "delete {range:?}: {} contained subtrees",
            contained.len()
        );
        if let Some(text) = self.text_mut(start.node) {
            text.truncate(start.offset);
        }
        if let Some(text) = self.text_mut(end.node) {
            text.drain(..end.offset);
        }
        for id in contained {
            self.remove_subtree(id)?;
        }
        debug_assert!(self.is_valid_point(start), "collapse point {start:?} went stale");
        Ok(start)
    }

    /// Insert a parentless node at `point`, splitting a text node when the
    /// point falls strictly inside it.
    pub fn insert_node_at(&mut self, point: BoundaryPoint, node: Id) -> Result<(), DomError> {
        match self.kind(point.node) {
            Some(NodeKind::Text { text }) => {
                let len = text.len();
                if point.offset > len || !text.is_char_boundary(point.offset) {
                    return Err(DomError::InvalidOffset {
                        node: point.node,
                        offset: point.offset,
                    });
                }
                let parent = self.parent(point.node).ok_or(DomError::Detached(point.node))?;
                let index = self
                    .index_in_parent(point.node)
                    .ok_or(DomError::Detached(point.node))?;
                if point.offset == 0 {
                    self.insert_child(parent, index, node)
                } else {
                    if point.offset < len {
                        self.split_text(point.node, point.offset)?;
                    }
                    self.insert_child(parent, index + 1, node)
                }
            }
            Some(NodeKind::Comment { .. }) => Err(DomError::WrongNodeKind(point.node)),
            Some(_) => self.insert_child(point.node, point.offset, node),
            None => Err(DomError::MissingNode(point.node)),
        }
    }

    // Child index `i` on the path is encoded as `2 * i + 1`, the gap before
    // child `i` as `2 * i`. Data-node offsets are appended raw. Plain
    // lexicographic order on these keys is tree order.
    fn point_key(&self, point: BoundaryPoint) -> Option<Vec<usize>> {
        if !self.is_valid_point(point) {
            return None;
        }
        let mut key = Vec::new();
        let mut current = point.node;
        while let Some(index) = self.index_in_parent(current) {
            key.push(2 * index + 1);
            current = self.parent(current)?;
        }
        if current != self.root() {
            return None;
        }
        key.reverse();
        match self.kind(point.node)? {
            NodeKind::Text { .. } | NodeKind::Comment { .. } => key.push(point.offset),
            _ => key.push(2 * point.offset),
        }
        Some(key)
    }
}
