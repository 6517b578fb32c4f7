use std::fmt;

use miette::SourceSpan;

/// A point in a source file. Lines start at 1, columns at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub line: u32,
    pub column: u32,
}

impl Point {
    pub fn new(line: u32, column: u32) -> Self {
        Point { line, column }
    }

    /// Byte offset of this point inside `source`, clamped to the end of the text.
    pub fn offset_in(&self, source: &str) -> usize {
        let mut offset = 0;
        for (index, line) in source.split_inclusive('\n').enumerate() {
            if index + 1 == self.line as usize {
                let content = line.trim_end_matches(['\n', '\r']);
                let column = content
                    .char_indices()
                    .nth(self.column as usize)
                    .map(|(i, _)| i)
                    .unwrap_or(content.len());
                return offset + column;
            }
            offset += line.len();
        }
        source.len()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The span of a node in its source file.
///
/// Positions are produced by the parse-tree to AST translation and never
/// change once attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

impl Position {
    pub fn new(start: Point, end: Point) -> Self {
        Position { start, end }
    }

    /// Shorthand used mostly by tests and by the AST builder.
    pub fn create(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Position {
            start: Point::new(start_line, start_column),
            end: Point::new(end_line, end_column),
        }
    }

    pub fn contains(&self, other: &Position) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Converts the line/column span into a byte span usable by miette.
    pub fn to_span(&self, source: &str) -> SourceSpan {
        let start = self.start.offset_in(source);
        let end = self.end.offset_in(source).max(start);
        SourceSpan::from((start, end - start))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_offsets() {
        let source = "namespace foo\nint x\n";
        assert_eq!(Point::new(1, 0).offset_in(source), 0);
        assert_eq!(Point::new(2, 0).offset_in(source), 14);
        assert_eq!(Point::new(2, 4).offset_in(source), 18);
        // Past the end of a line clamps to the line end
        assert_eq!(Point::new(2, 40).offset_in(source), 19);
        // Past the last line clamps to the end of the text
        assert_eq!(Point::new(9, 0).offset_in(source), source.len());
    }

    #[test]
    fn test_position_to_span() {
        let source = "namespace foo\nint x\n";
        let span = Position::create(2, 0, 2, 5).to_span(source);
        assert_eq!(span.offset(), 14);
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn test_position_ordering_and_containment() {
        let outer = Position::create(1, 0, 5, 0);
        let inner = Position::create(2, 3, 2, 9);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer < inner);
        assert_eq!(inner.to_string(), "2:3-2:9");
    }
}
