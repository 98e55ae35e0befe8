//! Text edits and fix sets for lint autofixes.
//!
//! A lint pass proposes zero or more [`TextEdit`]s per file. A [`FixSet`]
//! collects them and applies them in a single pass:
//! - Edits are ordered by start offset, then by insertion order
//! - An edit overlapping (or touching) one already applied is deferred
//! - Deferred edits are reported back so the caller can re-lint and retry

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Span
// ============================================================================

/// Byte offsets into file content.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Edits
// ============================================================================

/// Replace the bytes in `span` with `text`.
///
/// Inserts are modelled as empty spans, deletes as empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// The byte range to replace.
    pub span: Span,
    /// The replacement text.
    pub text: String,
}

impl TextEdit {
    /// Create a replacement edit.
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        TextEdit {
            span,
            text: text.into(),
        }
    }
}

// ============================================================================
// Conflicts
// ============================================================================

/// Why an edit could not be applied in the current pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conflict {
    /// The edit overlaps or touches an edit applied earlier in the pass.
    Overlapping { span: Span, applied: Span },

    /// The edit's span lies outside the content.
    OutOfBounds { span: Span, len: usize },

    /// The edit's span does not fall on UTF-8 character boundaries.
    NotCharBoundary { span: Span },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::Overlapping { span, applied } => {
                write!(f, "edit {} overlaps applied edit {}", span, applied)
            }
            Conflict::OutOfBounds { span, len } => {
                write!(f, "edit {} out of bounds for content of {} bytes", span, len)
            }
            Conflict::NotCharBoundary { span } => {
                write!(f, "edit {} is not on a character boundary", span)
            }
        }
    }
}

// ============================================================================
// FixSet
// ============================================================================

/// Result of applying a [`FixSet`] to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// The content with all applied edits.
    pub output: String,
    /// Indices (into the fix set) of edits that were applied.
    pub applied: Vec<usize>,
    /// Indices of edits that were deferred, with the reason.
    pub deferred: Vec<(usize, Conflict)>,
}

impl ApplyOutcome {
    /// Whether any edit changed the content.
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// An ordered collection of edits against a single file's content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixSet {
    edits: Vec<TextEdit>,
}

impl FixSet {
    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Edit indices in deterministic application order: by span start, then
    /// by span end, then by insertion order.
    fn ordered(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.edits.len()).collect();
        order.sort_by(|&a, &b| {
            let (sa, sb) = (self.edits[a].span, self.edits[b].span);
            sa.start
                .cmp(&sb.start)
                .then(sa.end.cmp(&sb.end))
                .then(a.cmp(&b))
        });
        order
    }

    /// Apply every edit that does not collide with an earlier one.
    ///
    /// An edit is deferred when its start is at or before the end of the
    /// previously applied edit, so two fixes never touch the same boundary
    /// within one pass.
    #[must_use]
    pub fn apply(&self, content: &str) -> ApplyOutcome {
        let mut output = String::with_capacity(content.len());
        let mut applied = Vec::new();
        let mut deferred = Vec::new();
        let mut last: Option<Span> = None;
        let mut cursor = 0usize;

        for index in self.ordered() {
            let edit = &self.edits[index];
            let span = edit.span;

            if span.end > content.len() {
                deferred.push((
                    index,
                    Conflict::OutOfBounds {
                        span,
                        len: content.len(),
                    },
                ));
                continue;
            }
            if !content.is_char_boundary(span.start) || !content.is_char_boundary(span.end) {
                deferred.push((index, Conflict::NotCharBoundary { span }));
                continue;
            }
            if let Some(prev) = last {
                if span.start <= prev.end {
                    tracing::warn!("deferring edit {} (overlaps {})", span, prev);
                    deferred.push((
                        index,
                        Conflict::Overlapping {
                            span,
                            applied: prev,
                        },
                    ));
                    continue;
                }
            }

            output.push_str(&content[cursor..span.start]);
            output.push_str(&edit.text);
            cursor = span.end;
            last = Some(span);
            applied.push(index);
        }

        output.push_str(&content[cursor..]);
        ApplyOutcome {
            output,
            applied,
            deferred,
        }
    }
}

impl FromIterator<TextEdit> for FixSet {
    fn from_iter<I: IntoIterator<Item = TextEdit>>(iter: I) -> Self {
        FixSet {
            edits: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
