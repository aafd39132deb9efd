//! Text selection representation.

/// A selection as a byte range, normalized so `start <= end`.
///
/// Offsets produced by [`InputValueStore`](crate::InputValueStore) are always
/// on UTF-8 character boundaries of the field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRange {
    /// Start byte offset of the selection (inclusive).
    pub start: usize,
    /// End byte offset of the selection (exclusive).
    pub end: usize,
}

impl SelectionRange {
    /// Create a new selection range; the endpoints may come in either order.
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A zero-width selection, i.e. a plain caret.
    #[inline]
    pub fn collapsed(at: usize) -> Self {
        Self { start: at, end: at }
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Returns the selected substring from the given value.
    ///
    /// # Panics
    ///
    /// Panics if `start` or `end` are out of bounds or not on character boundaries.
    #[inline]
    pub fn slice<'a>(&self, value: &'a str) -> &'a str {
        &value[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_range_normalizes() {
        let range = SelectionRange::new(10, 5);
        assert_eq!(range, SelectionRange { start: 5, end: 10 });
        assert_eq!(range.len(), 5);
    }

    #[test]
    fn collapsed_range_is_empty() {
        assert!(SelectionRange::collapsed(3).is_collapsed());
        assert!(!SelectionRange::new(3, 5).is_collapsed());
    }

    #[test]
    fn selection_range_slice() {
        assert_eq!(SelectionRange::new(1, 4).slice("hello"), "ell");
    }
}
