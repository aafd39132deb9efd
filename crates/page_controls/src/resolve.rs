//! Target resolution for controls.
//!
//! Tiers are tried in order and the first hit wins. Failures at any tier are
//! never errors: they fall through to the next one.

use crate::config::Selectors;
use crate::focus::LastFocused;
use html::{Document, Id, SelectorList};

/// Which lookup produced a [`Resolution`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// `data-target` selector on the control.
    Explicit,
    LastFocused,
    /// First target inside the control's enclosing group.
    Group,
    /// Page-wide fallback marker.
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub target: Id,
    pub tier: Tier,
}

impl Resolution {
    fn new(target: Id, tier: Tier) -> Self {
        Self { target, tier }
    }
}

/// Resolve the target of a symbol control.
pub fn resolve_insert_target(
    doc: &Document,
    control: Id,
    last: &LastFocused,
    selectors: &Selectors,
) -> Option<Resolution> {
    let resolution = explicit_target(doc, control)
        .map(|id| Resolution::new(id, Tier::Explicit))
        .or_else(|| last.live(doc).map(|id| Resolution::new(id, Tier::LastFocused)))
        .or_else(|| {
            group_target(doc, control, &selectors.symbol_group, &selectors.symbol_targets)
                .map(|id| Resolution::new(id, Tier::Group))
        })
        .or_else(|| fallback_target(doc, &selectors.fallback).map(|id| Resolution::new(id, Tier::Fallback)));
    log_outcome(control, resolution);
    resolution
}

/// Resolve the target of a clear control. The last-focused target is not
/// consulted.
pub fn resolve_clear_target(doc: &Document, control: Id, selectors: &Selectors) -> Option<Resolution> {
    let resolution = explicit_target(doc, control)
        .map(|id| Resolution::new(id, Tier::Explicit))
        .or_else(|| {
            group_target(doc, control, &selectors.clear_group, &selectors.clear_targets)
                .map(|id| Resolution::new(id, Tier::Group))
        })
        .or_else(|| fallback_target(doc, &selectors.fallback).map(|id| Resolution::new(id, Tier::Fallback)));
    log_outcome(control, resolution);
    resolution
}

/// First element matching the control's `data-target` selector. A malformed
/// selector counts as no match.
pub fn explicit_target(doc: &Document, control: Id) -> Option<Id> {
    let selector = doc.attr(control, "data-target")?;
    match doc.query_selector_str(doc.root(), selector) {
        Ok(Some(id)) => Some(id),
        Ok(None) => {
            log::debug!(
                target: "page_controls.resolve",
                "data-target {selector:?} on {control:?} matched nothing"
            );
            None
        }
        Err(err) => {
            log::debug!(
                target: "page_controls.resolve",
                "data-target {selector:?} on {control:?} is not a valid selector: {err}"
            );
            None
        }
    }
}

/// First match of `targets` inside the closest `group` around `control`, or
/// inside the whole document when there is no group.
pub fn group_target(doc: &Document, control: Id, group: &SelectorList, targets: &SelectorList) -> Option<Id> {
    let scope = doc.closest(control, group).unwrap_or_else(|| doc.root());
    doc.query_selector(scope, targets)
}

pub fn fallback_target(doc: &Document, fallback: &SelectorList) -> Option<Id> {
    doc.query_selector(doc.root(), fallback)
}

fn log_outcome(control: Id, resolution: Option<Resolution>) {
    match resolution {
        Some(r) => log::debug!(
            target: "page_controls.resolve",
            "control {control:?} resolved {:?} via {:?}",
            r.target,
            r.tier
        ),
        None => log::debug!(target: "page_controls.resolve", "control {control:?} has no target"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControlsConfig;
    use html::test_utils::{doc, elem};
    use pretty_assertions::assert_eq;

    fn selectors() -> Selectors {
        ControlsConfig::default().compile().unwrap()
    }

    #[test]
    fn malformed_explicit_selector_falls_through() {
        let document = Document::from_tree(&doc(vec![
            elem(2, "button", vec![("data-target", "[oops")], vec![]),
            elem(3, "textarea", vec![], vec![]),
        ]))
        .unwrap();
        let resolution = resolve_insert_target(&document, Id(2), &LastFocused::new(), &selectors());
        assert_eq!(resolution, Some(Resolution::new(Id(3), Tier::Group)));
    }

    #[test]
    fn group_lookup_is_scoped_to_enclosing_group() {
        let document = Document::from_tree(&doc(vec![
            elem(
                2,
                "div",
                vec![("class", "symbol-container")],
                vec![elem(3, "input", vec![("type", "text")], vec![])],
            ),
            elem(
                4,
                "div",
                vec![("class", "symbol-container")],
                vec![
                    elem(5, "button", vec![("data-symbol", "∧")], vec![]),
                    elem(6, "textarea", vec![], vec![]),
                ],
            ),
        ]))
        .unwrap();
        let resolution = resolve_insert_target(&document, Id(5), &LastFocused::new(), &selectors());
        assert_eq!(resolution, Some(Resolution::new(Id(6), Tier::Group)));
    }

    #[test]
    fn clear_resolution_uses_input_group_and_form_control_class() {
        let document = Document::from_tree(&doc(vec![elem(
            2,
            "div",
            vec![("class", "input-group")],
            vec![
                elem(3, "input", vec![("type", "text")], vec![]),
                elem(4, "input", vec![("class", "form-control")], vec![]),
                elem(5, "button", vec![("class", "clear-button")], vec![]),
            ],
        )]))
        .unwrap();
        assert_eq!(
            resolve_clear_target(&document, Id(5), &selectors()),
            Some(Resolution::new(Id(4), Tier::Group))
        );
    }

    #[test]
    fn nothing_resolves_on_empty_page() {
        let document = Document::from_tree(&doc(vec![elem(2, "button", vec![], vec![])])).unwrap();
        assert_eq!(
            resolve_insert_target(&document, Id(2), &LastFocused::new(), &selectors()),
            None
        );
        assert_eq!(resolve_clear_target(&document, Id(2), &selectors()), None);
    }
}
