//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines are **1-indexed** (matching editor conventions)
//! - Columns are **0-indexed** and count Unicode scalar values
//! - Byte offsets are **0-indexed**
//!
//! [`LineIndex`] precomputes line starts so repeated lookups over one file are
//! `O(log n)`.

use crate::types::Position;

// ============================================================================
// Line Index
// ============================================================================

/// Precomputed line start offsets for a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Build an index over `content`.
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex {
            line_starts,
            len: content.len(),
        }
    }

    /// 1-indexed line containing `offset`. Offsets past the end clamp to the
    /// last line.
    pub fn line_of(&self, offset: usize) -> u32 {
        let offset = offset.min(self.len);
        match self.line_starts.binary_search(&offset) {
            Ok(i) => i as u32 + 1,
            Err(i) => i as u32,
        }
    }

    /// Byte offset of the start of a 1-indexed line.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        let idx = (line as usize).checked_sub(1)?;
        self.line_starts.get(idx).copied()
    }

    /// Convert a byte offset to a [`Position`].
    pub fn position(&self, content: &str, offset: usize) -> Position {
        let offset = offset.min(content.len());
        let line = self.line_of(offset);
        let start = self.line_start(line).unwrap_or(0);
        let column = content
            .get(start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - start);
        Position::new(line, column as u32)
    }
}

// ============================================================================
// Tests
// ============================================================================
