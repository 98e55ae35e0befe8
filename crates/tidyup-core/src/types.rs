//! Common types shared between error and output modules.

use serde::{Deserialize, Serialize};

use crate::patch::Span;

// ============================================================================
// Position Types
// ============================================================================

/// A point in source text: 1-indexed line, 0-indexed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column (0-indexed, Unicode scalar values).
    pub column: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Start and end positions of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(start: Position, end: Position) -> Self {
        SourceLocation { start, end }
    }
}

// ============================================================================
// Location Type
// ============================================================================

/// Location of a reported issue in a file.
///
/// - `file`: path as given to the linter
/// - `line`/`column`: start of the issue
/// - `end_line`/`end_column`: end of the issue, when it spans a range
/// - `span`: byte range, when known
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// File path.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed).
    pub column: u32,
    /// End line (1-indexed, optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    /// End column (0-indexed, optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    /// Byte range (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Location {
    /// Create a point location.
    pub fn point(file: impl Into<String>, position: Position) -> Self {
        Location {
            file: file.into(),
            line: position.line,
            column: position.column,
            end_line: None,
            end_column: None,
            span: None,
        }
    }

    /// Create a range location.
    pub fn range(file: impl Into<String>, loc: SourceLocation, span: Span) -> Self {
        Location {
            file: file.into(),
            line: loc.start.line,
            column: loc.start.column,
            end_line: Some(loc.end.line),
            end_column: Some(loc.end.column),
            span: Some(span),
        }
    }

    /// Comparison key for deterministic sorting: (file, line, column).
    fn sort_key(&self) -> (&str, u32, u32) {
        (&self.file, self.line, self.column)
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_location_serializes_without_range() {
        let loc = Location::point("src/index.ts", Position::new(3, 0));
        let json = serde_json::to_string(&loc).unwrap();
        assert!(!json.contains("end_line"));
        assert!(!json.contains("span"));
        assert!(json.contains("\"file\":\"src/index.ts\""));
        assert!(json.contains("\"line\":3"));
    }

    #[test]
    fn range_location_serializes_all_fields() {
        let loc = Location::range(
            "a.js",
            SourceLocation::new(Position::new(1, 0), Position::new(2, 13)),
            Span::new(0, 26),
        );
        let json = serde_json::to_string(&loc).unwrap();
        assert!(json.contains("\"end_line\":2"));
        assert!(json.contains("\"span\":{\"start\":0,\"end\":26}"));
    }

    #[test]
    fn locations_sort_by_file_then_position() {
        let mut locs = vec![
            Location::point("b.js", Position::new(1, 0)),
            Location::point("a.js", Position::new(4, 2)),
            Location::point("a.js", Position::new(4, 0)),
        ];
        locs.sort();
        assert_eq!(locs[0].column, 0);
        assert_eq!(locs[0].file, "a.js");
        assert_eq!(locs[2].file, "b.js");
    }
}
