use std::fmt::Display;

/// Represents a source code position with line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePos {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

impl Display for SourcePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents a span in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`, used for virtual tokens.
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// True if `offset` lies inside the span. The end offset counts as inside
    /// so that a cursor placed right after a token still finds it.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Convert byte offsets into 1-indexed line/column positions.
    pub fn to_pos(&self, source: &str) -> Option<(SourcePos, SourcePos)> {
        if self.end > source.len() || self.start > self.end {
            return None;
        }
        let start = pos_of(source, self.start);
        let end = pos_of(source, self.end);
        Some((start, end))
    }
}

fn pos_of(source: &str, offset: usize) -> SourcePos {
    let mut line = 1;
    let mut column = 1;
    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    SourcePos { line, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let span = Span::new(4, 6).merge(Span::new(1, 5));
        assert_eq!(span, Span::new(1, 6));
    }

    #[test]
    fn test_to_pos() {
        let source = "module A where\nx = 1";
        let (start, end) = Span::new(15, 20).to_pos(source).unwrap();
        assert_eq!(start, SourcePos { line: 2, column: 1 });
        assert_eq!(end, SourcePos { line: 2, column: 6 });
        assert!(Span::new(0, 99).to_pos(source).is_none());
    }

    #[test]
    fn test_contains_end() {
        let span = Span::new(2, 4);
        assert!(span.contains(4));
        assert!(!span.contains(5));
        assert!(Span::empty(3).contains(3));
    }
}
