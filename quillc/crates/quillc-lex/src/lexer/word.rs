//! Identifier, keyword, and word-operator lexing.

use quillc_util::Symbol;

use crate::token::{keyword_from_word, Token, TokenKind};
use crate::unicode::is_word_continue;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a word: an identifier, a keyword, or one of the word-shaped
    /// operators `not`/`and`/`or`/`xor`.
    pub(crate) fn lex_word(&mut self) -> Token {
        while is_word_continue(self.cursor.current()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        let kind = keyword_from_word(&text)
            .unwrap_or_else(|| TokenKind::Identifier(Symbol::intern(&text)));
        self.token(kind)
    }
}
