//! Decoded source buffer with a line table.
//!
//! The lexer and parser operate on Unicode scalar values, never on raw
//! bytes; all spans are scalar offsets. [`SourceBuffer`] owns the decoded
//! scalars of one file and precomputes the offsets of line starts so that
//! line/column lookup for diagnostics is a binary search.

use crate::error::SpanError;
use crate::Span;

/// A 1-based line/column position derived from a scalar offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// An owned, decoded source file.
///
/// # Examples
///
/// ```
/// use quillc_util::SourceBuffer;
///
/// let source = SourceBuffer::new("main.qll", "def main() {\n}\n");
/// assert_eq!(source.len(), 15);
/// assert_eq!(source.location(13).line, 2);
/// ```
pub struct SourceBuffer {
    name: String,
    chars: Vec<char>,
    /// Scalar offsets at which each line begins. `line_starts[0] == 0`.
    line_starts: Vec<usize>,
}

impl SourceBuffer {
    /// Decodes `text` into scalars and builds the line table.
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut line_starts = vec![0];
        for (i, &c) in chars.iter().enumerate() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            name: name.into(),
            chars,
            line_starts,
        }
    }

    /// The file name this buffer was read from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of scalars in the buffer.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns true if the buffer holds no scalars.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The decoded scalars.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Derives the 1-based line/column of a scalar offset.
    ///
    /// Offsets past the end of the buffer resolve to the position just
    /// after the last scalar, so end-of-file diagnostics stay printable.
    pub fn location(&self, offset: usize) -> Location {
        let offset = offset.min(self.chars.len());
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let column = offset - self.line_starts[line - 1] + 1;
        Location {
            line: line as u32,
            column: column as u32,
        }
    }

    /// Extracts the text covered by a span.
    pub fn slice(&self, span: Span) -> Result<String, SpanError> {
        if span.begin > span.end {
            return Err(SpanError::Backwards {
                begin: span.begin,
                end: span.end,
            });
        }
        if span.end > self.chars.len() {
            return Err(SpanError::OutOfBounds {
                begin: span.begin,
                end: span.end,
                len: self.chars.len(),
            });
        }
        Ok(self.chars[span.begin..span.end].iter().collect())
    }

    /// Returns the text of a 1-based line without its terminator.
    pub fn line_text(&self, line: u32) -> Result<String, SpanError> {
        let index = line as usize;
        if index == 0 || index > self.line_starts.len() {
            return Err(SpanError::NoSuchLine {
                line,
                lines: self.line_starts.len() as u32,
            });
        }
        let begin = self.line_starts[index - 1];
        let end = self
            .line_starts
            .get(index)
            .map(|&next| next - 1)
            .unwrap_or(self.chars.len());
        Ok(self.chars[begin..end].iter().collect())
    }
}
