//! Diagnostic module - error and warning reporting infrastructure.
//!
//! A [`Diagnostic`] is a plain value: the stage that produced it, a
//! severity level, a message, and a source span. The [`Handler`] is the
//! append-only sink both the lexer and the parser report into; it is owned
//! by the caller and shared by reference. Nothing in the core ever unwinds
//! on malformed input - diagnostics accumulate and the caller decides what
//! to do with them.
//!
//! # Examples
//!
//! ```
//! use quillc_util::{DiagnosticBuilder, Handler, Span, Stage};
//!
//! let handler = Handler::new();
//! DiagnosticBuilder::error("unterminated string literal")
//!     .stage(Stage::Lexer)
//!     .span(Span::new(4, 9))
//!     .emit(&handler);
//!
//! assert_eq!(handler.error_count(), 1);
//! ```

use std::cell::RefCell;
use std::fmt;

use crate::Span;

/// Which pipeline stage produced a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Parser,
    Unspecified,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexer => write!(f, "lexer"),
            Stage::Parser => write!(f, "parser"),
            Stage::Unspecified => write!(f, "compiler"),
        }
    }
}

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A problem that makes the output AST unreliable.
    Error,
    /// A problem worth reporting that does not invalidate the output.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with stage, severity, and location.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(stage: Stage, level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            stage,
            level,
            message: message.into(),
            span,
        }
    }

    /// Shorthand for an error diagnostic.
    pub fn error(stage: Stage, message: impl Into<String>, span: Span) -> Self {
        Self::new(stage, Level::Error, message, span)
    }

    /// Shorthand for a warning diagnostic.
    pub fn warning(stage: Stage, message: impl Into<String>, span: Span) -> Self {
        Self::new(stage, Level::Warning, message, span)
    }
}

/// Fluent builder for diagnostics.
///
/// The builder defaults to [`Stage::Unspecified`] and [`Span::DUMMY`];
/// the emitting stage is expected to fill both in.
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    /// Starts building an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            diagnostic: Diagnostic::error(Stage::Unspecified, message, Span::DUMMY),
        }
    }

    /// Starts building a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            diagnostic: Diagnostic::warning(Stage::Unspecified, message, Span::DUMMY),
        }
    }

    /// Sets the producing stage.
    pub fn stage(mut self, stage: Stage) -> Self {
        self.diagnostic.stage = stage;
        self
    }

    /// Sets the source span.
    pub fn span(mut self, span: Span) -> Self {
        self.diagnostic.span = span;
        self
    }

    /// Finishes building without emitting.
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }

    /// Emits the diagnostic into a handler.
    pub fn emit(self, handler: &Handler) {
        handler.emit(self.diagnostic);
    }
}

/// Append-only sink for diagnostics.
///
/// Interior mutability lets the sink be shared by plain `&Handler`
/// references down the lexer and parser call trees. The core is
/// single-threaded (no `Sync` requirement), so a `RefCell` suffices.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic. Diagnostics are kept in emission order,
    /// which for the core stages is source order.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Returns true if any error-level diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Total number of diagnostics of any level.
    pub fn count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Clones out all collected diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drops all collected diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}
