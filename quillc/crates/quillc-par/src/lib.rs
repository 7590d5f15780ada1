//! quillc-par - syntactic analysis for the Quill language.
//!
//! Transforms a token vector into a sequence of top-level statements.
//! The parser is non-fatal: a syntax error produces a diagnostic in the
//! shared sink, resynchronization to the next statement boundary, and an
//! `Invalid` placeholder node. The returned AST always exists; it is only
//! guaranteed well-formed when no diagnostics were emitted.
//!
//! Statement boundaries are a semicolon, a newline outside any
//! parenthesis/bracket/dict group, or the end of input. Inside groups
//! newlines are insignificant; statement blocks `{ … }` restore newline
//! significance for their bodies.
//!
//! ```
//! use quillc_lex::lex;
//! use quillc_par::{parse, StmtKind};
//! use quillc_util::{Handler, SourceBuffer};
//!
//! let source = SourceBuffer::new("demo.qll", "import std\nwild x = 1");
//! let handler = Handler::new();
//! let tokens = lex(&source, &handler);
//! let ast = parse(&tokens, &handler);
//!
//! assert!(!handler.has_errors());
//! assert_eq!(ast.len(), 2);
//! assert!(matches!(ast[0].kind, StmtKind::Import(_)));
//! ```

pub mod ast;
mod edge_cases;
mod expr;
mod items;
pub mod print;
mod stmt;
mod types;

pub use ast::*;
pub use print::dump_ast;

use quillc_lex::{Delimiter, Keyword, Operator, Token, TokenKind};
use quillc_util::{DiagnosticBuilder, Handler, Span, Stage, Symbol};

/// Parses a token vector into the top-level statement sequence.
///
/// `tokens` is expected to be lexer output (terminated by `Eof`), but any
/// token slice is accepted; parsing past the end behaves as end of input.
pub fn parse(tokens: &[Token], handler: &Handler) -> Ast {
    Parser::new(tokens, handler).parse_program()
}

/// Recursive descent parser over a token slice.
pub struct Parser<'a> {
    /// Token stream, normally ending in `Eof`.
    tokens: &'a [Token],

    /// Index of the current token.
    position: usize,

    /// Diagnostic sink for syntax errors.
    handler: &'a Handler,

    /// Depth of enclosing `(`/`[`/dict-`{` groups. Newlines are
    /// insignificant while this is nonzero.
    group_depth: u32,

    /// End offset of the last consumed token, for node spans.
    last_end: usize,

    /// Fallback token so the parser can always return a reference.
    eof: Token,
}

impl<'a> Parser<'a> {
    /// Creates a parser over lexed tokens.
    pub fn new(tokens: &'a [Token], handler: &'a Handler) -> Self {
        let end = tokens.last().map(|t| t.end).unwrap_or(0);
        Self {
            tokens,
            position: 0,
            handler,
            group_depth: 0,
            last_end: 0,
            eof: Token::new(TokenKind::Eof, end, end),
        }
    }

    /// Parses the whole program.
    pub fn parse_program(&mut self) -> Ast {
        let mut statements = Vec::new();
        loop {
            self.skip_statement_separators();
            if self.at_end() {
                break;
            }
            let before = self.position;
            statements.push(self.parse_statement());
            // A statement never parses from zero tokens; force progress
            // if recovery could not move either.
            if self.position == before {
                self.advance();
            }
        }
        statements
    }

    // =========================================================================
    // TOKEN NAVIGATION
    // =========================================================================

    /// Returns the current token.
    ///
    /// Inside a bracket group, newlines are skipped first; at group depth
    /// zero a newline is returned like any other token, because there it
    /// terminates a statement.
    pub(crate) fn current(&mut self) -> &Token {
        if self.group_depth > 0 {
            while matches!(
                self.tokens.get(self.position).map(|t| &t.kind),
                Some(TokenKind::Newline)
            ) {
                self.position += 1;
            }
        }
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    /// Kind of the token `offset` positions after the current one.
    ///
    /// Raw lookahead: newlines are not skipped. Offset 1 is all the
    /// grammar ever needs.
    pub(crate) fn peek_kind(&mut self, offset: usize) -> &TokenKind {
        self.current();
        match self.tokens.get(self.position + offset) {
            Some(token) => &token.kind,
            None => &self.eof.kind,
        }
    }

    /// Raw token index, used to guarantee forward progress in loops.
    pub(crate) fn position_index(&self) -> usize {
        self.position
    }

    /// Consumes the current token.
    pub(crate) fn advance(&mut self) {
        let end = self.current().end;
        self.last_end = end;
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Returns true at the end of the token stream.
    pub(crate) fn at_end(&mut self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    /// Begin offset of the current token, where the next node starts.
    pub(crate) fn begin_offset(&mut self) -> usize {
        self.current().begin
    }

    /// End offset of the last consumed token, where a finished node ends.
    pub(crate) fn end_offset(&self) -> usize {
        self.last_end
    }

    pub(crate) fn enter_group(&mut self) {
        self.group_depth += 1;
    }

    pub(crate) fn exit_group(&mut self) {
        self.group_depth = self.group_depth.saturating_sub(1);
    }

    /// Runs `body` with newline significance restored, as inside a
    /// statement block, then restores the surrounding group depth.
    pub(crate) fn with_statement_newlines<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.group_depth, 0);
        let result = body(self);
        self.group_depth = saved;
        result
    }

    // =========================================================================
    // TOKEN TESTS
    // =========================================================================

    pub(crate) fn check_keyword(&mut self, keyword: Keyword) -> bool {
        matches!(self.current().kind, TokenKind::Keyword(k) if k == keyword)
    }

    pub(crate) fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword, context: &str) -> Option<()> {
        if self.match_keyword(keyword) {
            Some(())
        } else {
            self.error_at_current(format!("expected `{keyword}` {context}"));
            None
        }
    }

    pub(crate) fn check_delimiter(&mut self, delimiter: Delimiter) -> bool {
        matches!(self.current().kind, TokenKind::Delimiter(d) if d == delimiter)
    }

    pub(crate) fn match_delimiter(&mut self, delimiter: Delimiter) -> bool {
        if self.check_delimiter(delimiter) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_delimiter(&mut self, delimiter: Delimiter, context: &str) -> Option<()> {
        if self.match_delimiter(delimiter) {
            Some(())
        } else {
            self.error_at_current(format!("expected `{delimiter}` {context}"));
            None
        }
    }

    pub(crate) fn check_operator(&mut self, operator: Operator) -> bool {
        matches!(self.current().kind, TokenKind::Operator(op) if op == operator)
    }

    pub(crate) fn match_operator(&mut self, operator: Operator) -> bool {
        if self.check_operator(operator) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes an identifier or reports what was found instead.
    pub(crate) fn expect_identifier(&mut self, context: &str) -> Option<Symbol> {
        match self.current().kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Some(name)
            },
            _ => {
                self.error_at_current(format!("expected an identifier {context}"));
                None
            },
        }
    }

    /// Returns true if the current token ends a statement.
    pub(crate) fn at_statement_boundary(&mut self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Eof
                | TokenKind::Newline
                | TokenKind::Delimiter(Delimiter::Semicolon)
                | TokenKind::Delimiter(Delimiter::CurlyClose)
        )
    }

    /// Skips newlines, semicolons, and stray comment tokens between
    /// statements.
    pub(crate) fn skip_statement_separators(&mut self) {
        while matches!(
            self.current().kind,
            TokenKind::Newline | TokenKind::Comment | TokenKind::Delimiter(Delimiter::Semicolon)
        ) {
            self.advance();
        }
    }

    // =========================================================================
    // ERRORS AND RECOVERY
    // =========================================================================

    /// Reports a syntax error at the current token.
    pub(crate) fn error_at_current(&mut self, message: String) {
        let span = self.current().span();
        self.error_at(span, message);
    }

    /// Reports a syntax error at an explicit span.
    pub(crate) fn error_at(&mut self, span: Span, message: String) {
        DiagnosticBuilder::error(message)
            .stage(Stage::Parser)
            .span(span)
            .emit(self.handler);
    }

    /// Advances to the next statement boundary after an error.
    ///
    /// Stops after a newline or semicolon, or in front of a closing
    /// bracket so the enclosing construct can finish. Group depth resets:
    /// recovery abandons whatever group the error happened inside.
    pub(crate) fn recover_to_statement_boundary(&mut self) {
        self.group_depth = 0;
        loop {
            match self.current().kind {
                TokenKind::Eof => return,
                TokenKind::Newline | TokenKind::Delimiter(Delimiter::Semicolon) => {
                    self.advance();
                    return;
                },
                TokenKind::Delimiter(Delimiter::CurlyClose) => return,
                _ => self.advance(),
            }
        }
    }
}
