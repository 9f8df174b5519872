//! Source text, byte spans and line/column positions

use serde::{Deserialize, Serialize};

/// A byte range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Offset of the first byte
    pub begin: usize,
    /// Offset one past the last byte
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Smallest span covering both `self` and `other`
    pub fn join(self, other: Span) -> Self {
        Self {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }

    /// Closed containment on byte offsets
    pub fn within(&self, outer: &Span) -> bool {
        self.begin >= outer.begin && self.end <= outer.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolved position of a span's start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position<'a> {
    /// Line number (1-based)
    pub line: usize,
    /// Column in characters (0-based)
    pub column: usize,
    pub begin_offset: usize,
    pub end_offset: usize,
    /// Text of the starting line, without its line terminator
    pub line_text: &'a str,
}

impl Position<'_> {
    /// Column of the first non-whitespace character on this line
    pub fn indentation(&self) -> usize {
        indentation_of(self.line_text)
    }

    /// Whether only whitespace precedes this position on its line
    pub fn begins_its_line(&self) -> bool {
        self.line_text
            .chars()
            .take(self.column)
            .all(char::is_whitespace)
    }
}

/// Number of leading whitespace characters
pub fn indentation_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Source text with a line index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line number (1-based) containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }

    /// Text of a line (1-based), without `\n` or `\r\n`
    pub fn line_text(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let text = &self.text[start..end];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }

    /// Byte offset where a line (1-based) starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)?).copied()
    }

    /// Whether a span lies inside the text on character boundaries
    pub fn contains_span(&self, span: Span) -> bool {
        span.begin <= span.end
            && self.text.is_char_boundary(span.begin)
            && self.text.is_char_boundary(span.end)
    }

    /// Source text covered by a span
    pub fn slice(&self, span: Span) -> Option<&str> {
        self.text.get(span.begin..span.end)
    }

    /// Resolve the start of a span to line, column and line text
    pub fn position(&self, span: Span) -> Position<'_> {
        let line = self.line_of(span.begin);
        let start = self.line_starts[line - 1];
        // characters starting before `begin`, so offsets inside a
        // character or past the end never slice
        let column = self.text[start..]
            .char_indices()
            .take_while(|(i, _)| start + i < span.begin)
            .count();
        Position {
            line,
            column,
            begin_offset: span.begin,
            end_offset: span.end,
            line_text: self.line_text(line).unwrap_or(""),
        }
    }
}
