//! Core error types for quillc-util.
//!
//! These are the only `Err`-shaped failures in the front end; malformed
//! source input never produces them (that is what diagnostics are for).

use thiserror::Error;

/// Error type for span-to-source resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpanError {
    /// Span ends before it begins.
    #[error("invalid span: begin {begin} > end {end}")]
    Backwards { begin: usize, end: usize },

    /// Span reaches past the end of the buffer.
    #[error("span {begin}..{end} out of bounds: buffer has {len} scalars")]
    OutOfBounds {
        begin: usize,
        end: usize,
        len: usize,
    },

    /// Requested line does not exist.
    #[error("no line {line}: buffer has {lines} lines")]
    NoSuchLine { line: u32, lines: u32 },
}

/// Result type alias for span resolution.
pub type SpanResult<T> = std::result::Result<T, SpanError>;
