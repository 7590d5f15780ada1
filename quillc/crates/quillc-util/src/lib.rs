//! quillc-util - foundation types for the Quill compiler front end.
//!
//! This crate holds everything the phase crates share:
//!
//! - [`Span`] and [`SourceBuffer`] - scalar-offset source locations and
//!   the decoded buffer they index into
//! - [`Diagnostic`], [`DiagnosticBuilder`], and [`Handler`] - the
//!   append-only error sink both stages report into
//! - [`Symbol`] - interned identifier strings
//! - [`error`] - the `thiserror` types for util-level failures
//!
//! Nothing here performs I/O and nothing here is specific to one phase.

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Level, Stage};
pub use error::{SpanError, SpanResult};
pub use span::{Location, SourceBuffer, Span};
pub use symbol::Symbol;
