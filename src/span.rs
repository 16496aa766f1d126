use serde::Serialize;
use std::fmt;

/// A location in the source text. Lines and columns are 1-based,
/// the offset counts characters from the start of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A contiguous region of source text, from `start` (inclusive) to `end` (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-length span at the given position.
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// The span from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize, column: usize, offset: usize) -> Position {
        Position {
            line,
            column,
            offset,
        }
    }

    #[test]
    fn span_to_covers_both_ends() {
        let a = Span::new(at(1, 1, 0), at(1, 4, 3));
        let b = Span::new(at(1, 8, 7), at(1, 10, 9));
        let joined = a.to(&b);
        assert_eq!(joined.start.offset, 0);
        assert_eq!(joined.end.offset, 9);
    }

    #[test]
    fn span_containment() {
        let outer = Span::new(at(1, 1, 0), at(2, 5, 20));
        let inner = Span::new(at(1, 3, 2), at(1, 6, 5));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }
}
