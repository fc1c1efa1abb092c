//! Text position utilities: spans, line index, and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count Unicode scalar values (chars), not bytes
//!
//! Locations are computed in a separate pass after extraction: the walker
//! records byte [`Span`]s, and a [`LineIndex`] built once per file turns
//! them into [`SourceLocation`]s. When no source is available the empty
//! location sentinel is used instead.

use memchr::memchr_iter;
use serde::{Deserialize, Serialize};

// ============================================================================
// Span
// ============================================================================

/// A half-open byte range `[start, end)` into a source buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span. `end` is clamped so that it never precedes `start`.
    pub fn new(start: usize, end: usize) -> Self {
        Span {
            start,
            end: end.max(start),
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

// ============================================================================
// Source Location
// ============================================================================

/// A resolved position in a source file.
///
/// `line` and `column` are `None` for the empty sentinel produced when the
/// source buffer is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: Option<u32>,
    /// Column number (1-indexed, chars).
    pub column: Option<u32>,
    /// Byte offset from file start.
    pub offset: usize,
}

impl SourceLocation {
    /// The empty location: no line, no column, offset 0.
    pub const fn empty() -> Self {
        SourceLocation {
            line: None,
            column: None,
            offset: 0,
        }
    }

    /// Create a fully resolved location.
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        SourceLocation {
            line: Some(line),
            column: Some(column),
            offset,
        }
    }

    /// Returns true if this is the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.column.is_none()
    }
}

// ============================================================================
// Line Index
// ============================================================================

/// Precomputed newline table for fast offset → line:column conversion.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Build the index for `source`.
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = Vec::with_capacity(source.len() / 32 + 1);
        line_starts.push(0);
        line_starts.extend(memchr_iter(b'\n', source.as_bytes()).map(|i| i + 1));
        LineIndex {
            source,
            line_starts,
        }
    }

    /// Number of lines (a trailing newline does not open a new line).
    pub fn line_count(&self) -> usize {
        if self.source.is_empty() {
            0
        } else if self.source.ends_with('\n') {
            self.line_starts.len() - 1
        } else {
            self.line_starts.len()
        }
    }

    /// Resolve a byte offset. Offsets past the end clamp to the end of content.
    pub fn location(&self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.source.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self
            .source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        SourceLocation::new(line_idx as u32 + 1, column as u32 + 1, offset)
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Convert a byte offset to 1-indexed line and column (Unicode-aware).
///
/// Columns count Unicode scalar values (chars), not bytes.
pub fn byte_offset_to_position_str(content: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;
    let mut current_offset = 0usize;

    for ch in content.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    (line, col)
}

/// Extract the text content of a span as a string.
///
/// Returns `None` if the span extends beyond content bounds or does not
/// fall on char boundaries.
pub fn extract_span_str<'a>(content: &'a str, span: &Span) -> Option<&'a str> {
    content.get(span.start..span.end)
}

/// Collapse every run of whitespace out of `text`.
///
/// Used to compare type spellings independent of formatting.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

// ============================================================================
// Tests
// ============================================================================
