//! Core lexer implementation: the `Lexer` struct and token dispatch.

use quillc_util::{DiagnosticBuilder, Handler, SourceBuffer, Span, Stage};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use crate::unicode::is_word_start;

/// Lexes an entire source buffer into a token vector ending in `Eof`.
///
/// The lexer is total: malformed input produces `Invalid` tokens and
/// diagnostics in `handler`, never a failure to return.
///
/// # Examples
///
/// ```
/// use quillc_lex::{lex, TokenKind};
/// use quillc_util::{Handler, SourceBuffer};
///
/// let source = SourceBuffer::new("demo.qll", "x = 1");
/// let handler = Handler::new();
/// let tokens = lex(&source, &handler);
///
/// assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
/// assert!(!handler.has_errors());
/// ```
pub fn lex(source: &SourceBuffer, handler: &Handler) -> Vec<Token> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

/// Lexer for Quill source code.
///
/// Transforms decoded scalars into tokens. Whitespace is skipped,
/// comments are consumed silently, newlines are emitted as tokens, and
/// every other scalar starts exactly one token.
pub struct Lexer<'a> {
    /// Scalar cursor over the source buffer.
    pub(crate) cursor: Cursor<'a>,

    /// Diagnostic sink for lexical errors.
    handler: &'a Handler,

    /// Scalar offset where the current token started.
    pub(crate) token_start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over a decoded source buffer.
    pub fn new(source: &'a SourceBuffer, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source.chars()),
            handler,
            token_start: 0,
        }
    }

    /// Returns the next token.
    ///
    /// Skips whitespace and comments, records the token start, then
    /// dispatches on at most two scalars of lookahead.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();

        if self.cursor.is_at_end() {
            return self.token(TokenKind::Eof);
        }

        match self.cursor.current() {
            '\n' => {
                self.cursor.advance();
                self.token(TokenKind::Newline)
            },
            'b' if self.cursor.peek(1) == '"' => {
                self.cursor.advance();
                self.lex_string_literal(true)
            },
            'b' if self.cursor.peek(1) == '\'' => {
                self.cursor.advance();
                self.lex_char_literal(true)
            },
            c if is_word_start(c) => self.lex_word(),
            c if c.is_ascii_digit() => self.lex_number(),
            '.' if self.cursor.peek(1).is_ascii_digit() => self.lex_number(),
            '"' => self.lex_string_literal(false),
            '\'' => self.lex_char_literal(false),
            '.' | ',' | ':' | ';' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '+' | '-' | '*'
            | '/' | '%' | '^' | '=' | '<' | '>' | '&' | '|' | '~' => self.lex_symbol(),
            c => {
                self.cursor.advance();
                self.report_error(format!("unknown character '{c}'"));
                self.token(TokenKind::Invalid)
            },
        }
    }

    /// Builds a token spanning from the recorded start to the cursor.
    pub(crate) fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.token_start, self.cursor.position())
    }

    /// Reports a lexical error spanning the current token.
    pub(crate) fn report_error(&self, message: String) {
        self.report_error_at(Span::new(self.token_start, self.cursor.position()), message);
    }

    /// Reports a lexical error at an explicit span.
    pub(crate) fn report_error_at(&self, span: Span, message: String) {
        DiagnosticBuilder::error(message)
            .stage(Stage::Lexer)
            .span(span)
            .emit(self.handler);
    }
}

/// Tokens until `Eof`, which is not yielded.
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
