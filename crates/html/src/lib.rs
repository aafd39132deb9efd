//! # html
//!
//! DOM model for page controls: an arena [`Document`] with parent links and
//! stable ids, boundary-point ranges, a small selector engine, and HTML
//! character reference decoding.

pub mod range;
pub mod selector;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod traverse;

mod document;
mod entities;
mod types;

pub use crate::document::{Document, DomError};
pub use crate::entities::decode_entities;
pub use crate::range::{BoundaryPoint, DomRange};
pub use crate::selector::{SelectorError, SelectorList};
pub use crate::types::{Attribute, Id, Node, NodeId, NodeKind};
