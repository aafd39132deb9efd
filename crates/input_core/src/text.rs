//! UTF-8 text utilities for plain-field editing.

use std::borrow::Cow;

/// Clamp an arbitrary byte index to a valid UTF-8 character boundary.
///
/// Indices past the end clamp to `s.len()`; indices inside a multi-byte
/// character move back to that character's start.
///
/// # Examples
///
/// ```
/// use input_core::clamp_to_char_boundary;
///
/// let s = "a∑b"; // '∑' is 3 bytes
/// assert_eq!(clamp_to_char_boundary(s, 1), 1);
/// assert_eq!(clamp_to_char_boundary(s, 2), 1);
/// assert_eq!(clamp_to_char_boundary(s, 4), 4);
/// assert_eq!(clamp_to_char_boundary(s, 100), 5);
/// ```
#[inline]
pub fn clamp_to_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Remove CR and LF, for single-line fields.
///
/// # Examples
///
/// ```
/// use input_core::filter_single_line;
///
/// assert_eq!(filter_single_line("p → q"), "p → q");
/// assert_eq!(filter_single_line("a\r\nb"), "ab");
/// ```
pub fn filter_single_line(s: &str) -> Cow<'_, str> {
    if !s.contains(['\n', '\r']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|c| *c != '\n' && *c != '\r').collect())
}

/// Normalize CRLF and lone CR to LF, for multi-line fields.
///
/// # Examples
///
/// ```
/// use input_core::normalize_newlines;
///
/// assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
/// ```
pub fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if !s.contains('\r') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut it = s.chars().peekable();
    while let Some(ch) = it.next() {
        match ch {
            '\r' => {
                if it.peek() == Some(&'\n') {
                    let _ = it.next();
                }
                out.push('\n');
            }
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
