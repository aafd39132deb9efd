//! Caret-aware insertion and clearing.
//!
//! Both operations leave the target focused and queue a bubbling `input`
//! event on it. They never fail to the caller: DOM errors are logged and the
//! operation stops.

use crate::events::Event;
use crate::page::Page;
use crate::target::{self, Target};
use html::{BoundaryPoint, DomError, DomRange, Id, NodeKind};
use std::cmp::Ordering;

/// Insert `text` at the target's caret, replacing any selection, and leave
/// the caret right after it. Unknown or stale targets are a no-op.
pub fn insert(page: &mut Page, target: Id, text: &str) {
    let Some(shape) = target::classify(page.document(), target) else {
        log::debug!(target: "page_controls.insert", "insert into {target:?} skipped: not an element");
        return;
    };

    let outcome = match shape {
        Target::PlainField(id) => {
            insert_plain(page, id, text);
            Ok(())
        }
        Target::RichRegion(id) => insert_rich(page, id, text),
        Target::TextBearing(id) => append_text(page, id, text),
    };
    if let Err(err) = outcome {
        log::debug!(target: "page_controls.insert", "insert into {target:?} failed: {err}");
        return;
    }

    finish(page, target);
}

/// Empty the target: rich regions lose all children, plain fields get an
/// empty value with the caret at 0, other elements lose their text.
pub fn clear(page: &mut Page, target: Id) {
    let Some(shape) = target::classify(page.document(), target) else {
        log::debug!(target: "page_controls.insert", "clear of {target:?} skipped: not an element");
        return;
    };

    let outcome = match shape {
        Target::PlainField(id) => {
            page.ensure_field(id);
            page.fields_mut().clear_value(id);
            Ok(())
        }
        Target::RichRegion(id) => {
            let cleared = page.document_mut().clear_children(id);
            if cleared.is_ok() {
                page.set_selection(Some(DomRange::collapsed(BoundaryPoint::new(id, 0))));
            }
            cleared
        }
        Target::TextBearing(id) => page.document_mut().set_text_content(id, ""),
    };
    if let Err(err) = outcome {
        log::debug!(target: "page_controls.insert", "clear of {target:?} failed: {err}");
        return;
    }

    finish(page, target);
}

fn finish(page: &mut Page, target: Id) {
    page.prune_fields();
    page.focus(target);
    page.dispatch(Event::input(target));
}

fn insert_plain(page: &mut Page, id: Id, text: &str) {
    page.ensure_field(id);
    if let Some(caret) = page.fields_mut().replace_selection(id, text) {
        log::trace!(target: "page_controls.insert", "plain field {id:?} caret -> {caret}");
    }
}

fn insert_rich(page: &mut Page, region: Id, text: &str) -> Result<(), DomError> {
    let range = match region_selection(page, region) {
        Some(range) => range,
        None => {
            let end = page
                .document()
                .end_of_contents(region)
                .ok_or(DomError::MissingNode(region))?;
            DomRange::collapsed(end)
        }
    };

    let doc = page.document_mut();
    let at = doc.delete_range_contents(&range)?;
    let node = doc.create_text(text);
    doc.insert_node_at(at, node)?;
    let after = doc.point_after(node).ok_or(DomError::Detached(node))?;

    log::trace!(target: "page_controls.insert", "rich region {region:?} caret -> {after:?}");
    page.set_selection(Some(DomRange::collapsed(after)));
    Ok(())
}

/// The document selection, normalized, if both ends are valid points inside
/// `region` and text can be inserted at its start.
fn region_selection(page: &Page, region: Id) -> Option<DomRange> {
    let range = page.selection()?;
    let doc = page.document();
    if !doc.range_is_within(&range, region) {
        return None;
    }
    let range = match doc.compare_points(range.start, range.end)? {
        Ordering::Greater => DomRange::new(range.end, range.start),
        _ => range,
    };
    // Nothing can be inserted inside a comment.
    if matches!(doc.kind(range.start.node), Some(NodeKind::Comment { .. })) {
        return None;
    }
    Some(range)
}

fn append_text(page: &mut Page, id: Id, text: &str) -> Result<(), DomError> {
    let mut content = page.document().text_content(id);
    content.push_str(text);
    page.document_mut().set_text_content(id, &content)
}
