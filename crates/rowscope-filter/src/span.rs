//! Byte ranges into a filter string, carried on tokens, AST nodes and errors.

/// Byte range `start..end` of a filter string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span containing both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// A parsed piece of the expression and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    /// Convert the value, keeping its span.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned::new(f(self.value), self.span)
    }
}

/// Convert a byte offset to a 1-based character column.
///
/// Filter strings are single-line, so only the column is meaningful.
pub fn offset_to_column(source: &str, offset: usize) -> usize {
    source
        .char_indices()
        .take_while(|(i, _)| *i < offset)
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = Span::new(5, 10);
        let b = Span::new(8, 15);
        assert_eq!(a.merge(b), Span::new(5, 15));
    }

    #[test]
    fn test_span_from_range() {
        assert_eq!(Span::from(2..6), Span::new(2, 6));
    }

    #[test]
    fn test_offset_to_column() {
        assert_eq!(offset_to_column("a=1&b=2", 0), 1);
        assert_eq!(offset_to_column("a=1&b=2", 4), 5);
        // multi-byte characters count once
        assert_eq!(offset_to_column("é=1&b", 4), 4);
    }
}
