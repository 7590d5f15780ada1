//! Whitespace and comment skipping.

use quillc_util::Span;

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips spaces, tabs, carriage returns, and comments.
    ///
    /// Newlines are NOT skipped here; they are meaningful and get their
    /// own tokens. A line comment therefore ends just before its
    /// terminating newline, so comment text and trailing whitespace are
    /// interchangeable token-for-token.
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current() {
                ' ' | '\t' | '\r' => self.cursor.advance(),
                '#' => {
                    if self.cursor.peek(1) == '#' {
                        self.skip_block_comment();
                    } else {
                        self.skip_line_comment();
                    }
                },
                _ => return,
            }
        }
    }

    /// Skips from `#` to just before the end of the line.
    fn skip_line_comment(&mut self) {
        self.cursor.advance();
        while !self.cursor.is_at_end() && self.cursor.current() != '\n' {
            self.cursor.advance();
        }
    }

    /// Skips a `##`-delimited block comment, newlines included.
    ///
    /// Block comments do not nest: the first `##` after the opener
    /// closes it.
    fn skip_block_comment(&mut self) {
        let start = self.cursor.position();
        self.cursor.advance_n(2);

        loop {
            if self.cursor.is_at_end() {
                self.report_error_at(
                    Span::new(start, self.cursor.position()),
                    "unterminated block comment".to_owned(),
                );
                return;
            }
            if self.cursor.current() == '#' && self.cursor.peek(1) == '#' {
                self.cursor.advance_n(2);
                return;
            }
            self.cursor.advance();
        }
    }
}
