use html::{Document, Id};

/// Element shapes an insertion or clear can act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// `<textarea>` or a text-like `<input>`: flat value plus a selection range.
    PlainField(Id),
    /// Content-editable element: children are edited through the document
    /// selection.
    RichRegion(Id),
    /// Any other element; only its text content can be replaced.
    TextBearing(Id),
}

impl Target {
    pub fn id(self) -> Id {
        match self {
            Target::PlainField(id) | Target::RichRegion(id) | Target::TextBearing(id) => id,
        }
    }

    /// Plain fields and rich regions are eligible for focus tracking.
    pub fn is_eligible(self) -> bool {
        !matches!(self, Target::TextBearing(_))
    }
}

/// Input types that take free text.
const TEXT_INPUT_TYPES: [&str; 5] = ["text", "search", "tel", "url", "email"];

/// Every recognized `type` keyword. Anything else falls back to `text`.
const KNOWN_INPUT_TYPES: [&str; 22] = [
    "hidden",
    "text",
    "search",
    "tel",
    "url",
    "email",
    "password",
    "date",
    "month",
    "week",
    "time",
    "datetime-local",
    "number",
    "range",
    "color",
    "checkbox",
    "radio",
    "file",
    "submit",
    "image",
    "reset",
    "button",
];

/// Classify a live element. Non-elements and stale ids yield `None`.
pub fn classify(doc: &Document, id: Id) -> Option<Target> {
    if !doc.is_element(id) {
        return None;
    }
    if is_plain_field(doc, id) {
        Some(Target::PlainField(id))
    } else if is_rich_region(doc, id) {
        Some(Target::RichRegion(id))
    } else {
        Some(Target::TextBearing(id))
    }
}

pub fn is_eligible(doc: &Document, id: Id) -> bool {
    classify(doc, id).is_some_and(Target::is_eligible)
}

pub fn is_plain_field(doc: &Document, id: Id) -> bool {
    if doc.is_element_named(id, "textarea") {
        return true;
    }
    if !doc.is_element_named(id, "input") {
        return false;
    }
    let Some(ty) = doc.attr(id, "type") else {
        return true;
    };
    let ty = ty.trim().to_ascii_lowercase();
    TEXT_INPUT_TYPES.contains(&ty.as_str()) || !KNOWN_INPUT_TYPES.contains(&ty.as_str())
}

/// Content-editable state, inherited from the nearest ancestor that sets the
/// attribute to a recognized value.
pub fn is_rich_region(doc: &Document, id: Id) -> bool {
    std::iter::once(id)
        .chain(doc.ancestors(id))
        .find_map(|node| {
            let value = doc.attr(node, "contenteditable")?;
            if value.is_empty()
                || value.eq_ignore_ascii_case("true")
                || value.eq_ignore_ascii_case("plaintext-only")
            {
                Some(true)
            } else if value.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        })
        .unwrap_or(false)
}
