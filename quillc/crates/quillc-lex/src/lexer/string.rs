//! Char, string, buffer, and byte literal lexing.
//!
//! `'x'` is a Char and `"…"` a String; a `b` prefix turns them into a
//! Byte and a Buffer of 8-bit values. Triple-quoted forms permit embedded
//! newlines. Escape handling is shared by all of them.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a char (`'x'`) or byte (`b'x'`) literal. The cursor is at
    /// the opening quote; a `b` prefix has already been consumed.
    pub(crate) fn lex_char_literal(&mut self, is_byte: bool) -> Token {
        self.cursor.advance();

        // An empty literal is the null scalar / zero byte.
        if self.cursor.current() == '\'' {
            self.cursor.advance();
            return if is_byte {
                self.token(TokenKind::Byte(0))
            } else {
                self.token(TokenKind::Char('\0'))
            };
        }

        if self.cursor.is_at_end() || self.cursor.current() == '\n' {
            self.report_error("unterminated character literal".to_owned());
            return self.token(TokenKind::Invalid);
        }

        let value = if self.cursor.current() == '\\' {
            self.cursor.advance();
            self.lex_escape().unwrap_or('\0')
        } else {
            let c = self.cursor.current();
            self.cursor.advance();
            c
        };

        if !self.cursor.match_scalar('\'') {
            self.report_error("unterminated character literal".to_owned());
            while !self.cursor.is_at_end()
                && self.cursor.current() != '\''
                && self.cursor.current() != '\n'
            {
                self.cursor.advance();
            }
            self.cursor.match_scalar('\'');
        }

        if is_byte {
            if value as u32 > u8::MAX as u32 {
                self.report_error(format!("byte literal {value:?} does not fit in 8 bits"));
            }
            self.token(TokenKind::Byte(value as u32 as u8))
        } else {
            self.token(TokenKind::Char(value))
        }
    }

    /// Lexes a string (`"…"`) or buffer (`b"…"`) literal, including the
    /// triple-quoted multiline forms. The cursor is at the first quote;
    /// a `b` prefix has already been consumed.
    pub(crate) fn lex_string_literal(&mut self, is_buffer: bool) -> Token {
        let triple = self.cursor.peek(1) == '"' && self.cursor.peek(2) == '"';
        self.cursor.advance_n(if triple { 3 } else { 1 });

        let mut scalars = Vec::new();
        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated string literal".to_owned());
                break;
            }

            let c = self.cursor.current();
            if triple {
                if c == '"' && self.cursor.peek(1) == '"' && self.cursor.peek(2) == '"' {
                    self.cursor.advance_n(3);
                    break;
                }
            } else {
                if c == '"' {
                    self.cursor.advance();
                    break;
                }
                if c == '\n' {
                    // Leave the newline for its own token.
                    self.report_error("unterminated string literal".to_owned());
                    break;
                }
            }

            if c == '\\' {
                self.cursor.advance();
                if let Some(escaped) = self.lex_escape() {
                    scalars.push(escaped);
                }
            } else {
                scalars.push(c);
                self.cursor.advance();
            }
        }

        if is_buffer {
            let mut bytes = Vec::with_capacity(scalars.len());
            for c in scalars {
                if c as u32 > u8::MAX as u32 {
                    self.report_error(format!("buffer literal scalar {c:?} does not fit in 8 bits"));
                }
                bytes.push(c as u32 as u8);
            }
            self.token(TokenKind::Buffer(bytes))
        } else {
            self.token(TokenKind::String(scalars.into_iter().collect()))
        }
    }

    /// Lexes one escape sequence; the backslash is already consumed.
    ///
    /// Unknown escapes drop the backslash and keep the scalar, with a
    /// diagnostic. Returns `None` when no scalar can be produced.
    pub(crate) fn lex_escape(&mut self) -> Option<char> {
        if self.cursor.is_at_end() {
            self.report_error("unterminated escape sequence".to_owned());
            return None;
        }

        let c = self.cursor.current();
        self.cursor.advance();

        match c {
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{B}'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{C}'),
            'a' => Some('\u{7}'),
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            '0' => Some('\0'),
            'x' => self.lex_hex_escape(2),
            'u' => self.lex_hex_escape(4),
            'U' => self.lex_hex_escape(8),
            _ => {
                self.report_error(format!("unknown escape sequence '\\{c}'"));
                Some(c)
            },
        }
    }

    /// Lexes exactly `digits` hex digits into a scalar.
    fn lex_hex_escape(&mut self, digits: u32) -> Option<char> {
        let mut value: u32 = 0;
        for _ in 0..digits {
            match self.cursor.current().to_digit(16) {
                Some(digit) => {
                    value = value * 16 + digit;
                    self.cursor.advance();
                },
                None => {
                    self.report_error(format!("expected {digits} hex digits in escape sequence"));
                    return None;
                },
            }
        }
        match char::from_u32(value) {
            Some(c) => Some(c),
            None => {
                self.report_error(format!("escape sequence U+{value:04X} is not a valid scalar"));
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use quillc_util::{Handler, SourceBuffer};

    fn lex_kinds(source: &str) -> (Vec<TokenKind>, Handler) {
        let handler = Handler::new();
        let buffer = SourceBuffer::new("test.qll", source);
        let kinds = lex(&buffer, &handler)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !matches!(k, TokenKind::Eof | TokenKind::Newline))
            .collect();
        (kinds, handler)
    }

    fn lex_one(source: &str) -> TokenKind {
        let (kinds, handler) = lex_kinds(source);
        assert!(!handler.has_errors(), "unexpected diagnostics for {source}");
        assert_eq!(kinds.len(), 1);
        kinds.into_iter().next().unwrap()
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(
            lex_one("\"Hello, world!\""),
            TokenKind::String("Hello, world!".to_owned())
        );
    }

    #[test]
    fn test_escape_battery() {
        // The value is the 11-scalar sequence A B 0x42 0x88 U+1234
        // U+9876 VT U+1234 U+10000 " LF.
        let source = "\"AB\\x42\\x88\\u1234\\u9876\\v\\U00001234\\U00010000\\\"\\n\"";
        let expected: String = [
            'A', 'B', '\u{42}', '\u{88}', '\u{1234}', '\u{9876}', '\u{B}', '\u{1234}',
            '\u{10000}', '"', '\n',
        ]
        .iter()
        .collect();
        assert_eq!(lex_one(source), TokenKind::String(expected));
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(lex_one(r#""\a\b\f\0""#), TokenKind::String("\u{7}\u{8}\u{C}\0".to_owned()));
    }

    #[test]
    fn test_char() {
        assert_eq!(lex_one("'K'"), TokenKind::Char('K'));
        assert_eq!(lex_one(r"'\r'"), TokenKind::Char('\r'));
        assert_eq!(lex_one(r"'\U0001AF21'"), TokenKind::Char('\u{1AF21}'));
    }

    #[test]
    fn test_empty_char_is_null() {
        assert_eq!(lex_one("''"), TokenKind::Char('\0'));
        assert_eq!(lex_one("b''"), TokenKind::Byte(0));
    }

    #[test]
    fn test_byte_literal() {
        assert_eq!(lex_one("b'K'"), TokenKind::Byte(b'K'));
        assert_eq!(lex_one(r"b'\b'"), TokenKind::Byte(8));
        assert_eq!(lex_one(r"b'\x34'"), TokenKind::Byte(0x34));
    }

    #[test]
    fn test_byte_out_of_range() {
        let (kinds, handler) = lex_kinds("b'λ'");
        assert!(handler.has_errors());
        assert!(matches!(kinds[0], TokenKind::Byte(_)));
    }

    #[test]
    fn test_buffer() {
        assert_eq!(
            lex_one(r#"b"aFd\x87\x90\xff""#),
            TokenKind::Buffer(vec![b'a', b'F', b'd', 0x87, 0x90, 0xFF])
        );
        assert_eq!(
            lex_one("b\"Hello, world!\""),
            TokenKind::Buffer(b"Hello, world!".to_vec())
        );
    }

    #[test]
    fn test_triple_quoted_multiline() {
        assert_eq!(
            lex_one("\"\"\"Hello,\nworld!\"\"\""),
            TokenKind::String("Hello,\nworld!".to_owned())
        );
        assert_eq!(
            lex_one("b\"\"\"Hello,\nworld!\"\"\""),
            TokenKind::Buffer(b"Hello,\nworld!".to_vec())
        );
    }

    #[test]
    fn test_triple_quoted_embedded_quotes() {
        assert_eq!(
            lex_one("\"\"\"a \"b\" c\"\"\""),
            TokenKind::String("a \"b\" c".to_owned())
        );
    }

    #[test]
    fn test_unterminated_string() {
        let (_, handler) = lex_kinds("\"open");
        assert!(handler.has_errors());
    }

    #[test]
    fn test_newline_ends_single_quoted_string() {
        let handler = Handler::new();
        let buffer = SourceBuffer::new("test.qll", "\"open\nnext");
        let tokens = lex(&buffer, &handler);
        assert!(handler.has_errors());
        // The newline still produces its own token.
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Newline));
    }

    #[test]
    fn test_unknown_escape_keeps_scalar() {
        let (kinds, handler) = lex_kinds(r#""\q""#);
        assert!(handler.has_errors());
        assert_eq!(kinds[0], TokenKind::String("q".to_owned()));
    }

    #[test]
    fn test_bad_hex_escape() {
        let (kinds, handler) = lex_kinds(r#""\xZZ""#);
        assert!(handler.has_errors());
        // The bad escape contributes nothing; the literal survives.
        assert_eq!(kinds[0], TokenKind::String("ZZ".to_owned()));
    }

    #[test]
    fn test_unterminated_char() {
        let (_, handler) = lex_kinds("'x");
        assert!(handler.has_errors());
    }
}
