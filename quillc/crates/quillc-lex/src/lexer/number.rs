//! Number literal lexing.
//!
//! Decimal by default; `0x`/`0o`/`0b` prefixes select the base. A
//! fractional part is allowed in any base, an exponent only in decimal.
//! Suffixes pick the numeric token kind: `u`/`U` unsigned, `f` float,
//! `d` double, `i` imaginary double, `if` imaginary float, `b` byte.

use crate::token::{Token, TokenKind};
use crate::unicode::digit_in_base;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a number literal. The cursor is at the first digit, or at a
    /// `.` directly followed by a digit.
    pub(crate) fn lex_number(&mut self) -> Token {
        if self.cursor.current() == '0' {
            let base = match self.cursor.peek(1) {
                'x' | 'X' => Some(16),
                'o' | 'O' => Some(8),
                'b' | 'B' => Some(2),
                _ => None,
            };
            if let Some(base) = base {
                // `0b` with no binary digit after it is a byte-suffixed
                // zero, not a base prefix.
                let byte_suffix = self.cursor.peek(1) == 'b'
                    && digit_in_base(self.cursor.peek(2), 2).is_none();
                if !byte_suffix {
                    self.cursor.advance_n(2);
                    return self.lex_radix_number(base);
                }
            }
        }

        self.lex_decimal_number()
    }

    /// Lexes the digits of a hexadecimal, octal, or binary literal.
    fn lex_radix_number(&mut self, base: u32) -> Token {
        let digit_start = self.cursor.position();
        let mut value: u128 = 0;
        let mut overflowed = false;
        self.accumulate_digits(base, &mut value, &mut overflowed);

        if self.cursor.position() == digit_start {
            self.report_error(format!("no digits after base-{base} prefix"));
            return self.token(TokenKind::Integer(0));
        }

        if self.cursor.current() == '.' && digit_in_base(self.cursor.peek(1), base).is_some() {
            self.cursor.advance();
            let mut float_value = value as f64;
            let mut scale = 1.0 / base as f64;
            while let Some(digit) = digit_in_base(self.cursor.current(), base) {
                float_value += digit as f64 * scale;
                scale /= base as f64;
                self.cursor.advance();
            }
            return self.float_token(float_value);
        }

        if overflowed {
            self.report_error("integer literal overflows 128 bits; value wraps".to_owned());
        }
        self.integer_token(value)
    }

    /// Lexes a decimal literal, including fractions and exponents.
    fn lex_decimal_number(&mut self) -> Token {
        let start = self.token_start;

        while self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut is_float = false;
        if self.cursor.current() == '.' && self.cursor.peek(1).is_ascii_digit() {
            is_float = true;
            self.cursor.advance();
            while self.cursor.current().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        // An `e` only starts an exponent when digits actually follow;
        // otherwise it is left for the next token.
        if matches!(self.cursor.current(), 'e' | 'E') {
            let next = self.cursor.peek(1);
            let exponent = next.is_ascii_digit()
                || (matches!(next, '+' | '-') && self.cursor.peek(2).is_ascii_digit());
            if exponent {
                is_float = true;
                self.cursor.advance();
                if matches!(self.cursor.current(), '+' | '-') {
                    self.cursor.advance();
                }
                while self.cursor.current().is_ascii_digit() {
                    self.cursor.advance();
                }
            }
        }

        if is_float {
            let text = self.cursor.slice_from(start);
            let value = match text.parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    self.report_error(format!("invalid floating point literal '{text}'"));
                    0.0
                },
            };
            return self.float_token(value);
        }

        let mut value: u128 = 0;
        let mut overflowed = false;
        for c in self.cursor.slice_from(start).chars() {
            let digit = c as u128 - '0' as u128;
            match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                Some(next) => value = next,
                None => {
                    overflowed = true;
                    value = value.wrapping_mul(10).wrapping_add(digit);
                },
            }
        }
        if overflowed {
            self.report_error("integer literal overflows 128 bits; value wraps".to_owned());
        }
        self.integer_token(value)
    }

    /// Consumes digits in `base`, accumulating with wraparound on
    /// overflow.
    fn accumulate_digits(&mut self, base: u32, value: &mut u128, overflowed: &mut bool) {
        while let Some(digit) = digit_in_base(self.cursor.current(), base) {
            match value
                .checked_mul(base as u128)
                .and_then(|v| v.checked_add(digit as u128))
            {
                Some(next) => *value = next,
                None => {
                    *overflowed = true;
                    *value = value.wrapping_mul(base as u128).wrapping_add(digit as u128);
                },
            }
            self.cursor.advance();
        }
    }

    /// Applies an optional suffix to an integer-form literal.
    fn integer_token(&mut self, value: u128) -> Token {
        match self.cursor.current() {
            'u' | 'U' => {
                self.cursor.advance();
                self.token(TokenKind::Uinteger(value))
            },
            'i' => {
                self.cursor.advance();
                if self.cursor.match_scalar('f') {
                    self.token(TokenKind::IFloat(value as f32))
                } else {
                    self.token(TokenKind::IDouble(value as f64))
                }
            },
            'f' => {
                self.cursor.advance();
                self.token(TokenKind::Float(value as f32))
            },
            'd' => {
                self.cursor.advance();
                self.token(TokenKind::Double(value as f64))
            },
            'b' => {
                self.cursor.advance();
                if value > u8::MAX as u128 {
                    self.report_error(format!("byte literal {value} does not fit in 8 bits"));
                }
                self.token(TokenKind::Byte(value as u8))
            },
            _ => self.token(TokenKind::Integer(value as i128)),
        }
    }

    /// Applies an optional suffix to a float-form literal.
    fn float_token(&mut self, value: f64) -> Token {
        match self.cursor.current() {
            'i' => {
                self.cursor.advance();
                if self.cursor.match_scalar('f') {
                    self.token(TokenKind::IFloat(value as f32))
                } else {
                    self.token(TokenKind::IDouble(value))
                }
            },
            'f' => {
                self.cursor.advance();
                self.token(TokenKind::Float(value as f32))
            },
            'd' => {
                self.cursor.advance();
                self.token(TokenKind::Double(value))
            },
            'u' | 'U' | 'b' => {
                let suffix = self.cursor.current();
                self.cursor.advance();
                self.report_error(format!(
                    "integer suffix '{suffix}' on a floating point literal"
                ));
                self.token(TokenKind::Double(value))
            },
            _ => self.token(TokenKind::Double(value)),
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

    fn lex_num(source: &str) -> TokenKind {
        let (kinds, handler) = lex_kinds(source);
        assert!(!handler.has_errors(), "unexpected diagnostics for {source}");
        assert_eq!(kinds.len(), 1, "expected one token for {source}");
        kinds.into_iter().next().unwrap()
    }

    #[test]
    fn test_numeral_battery() {
        let source = "0 1 2 8 9 00 10 29u 0.1 0.2 11.1 .123 0xFFF 0x1 0o77 0o11 0b111 0b01 4i 2i 5.6i";
        let (kinds, handler) = lex_kinds(source);
        assert!(!handler.has_errors());
        assert_eq!(
            kinds,
            vec![
                TokenKind::Integer(0),
                TokenKind::Integer(1),
                TokenKind::Integer(2),
                TokenKind::Integer(8),
                TokenKind::Integer(9),
                TokenKind::Integer(0),
                TokenKind::Integer(10),
                TokenKind::Uinteger(29),
                TokenKind::Double(0.1),
                TokenKind::Double(0.2),
                TokenKind::Double(11.1),
                TokenKind::Double(0.123),
                TokenKind::Integer(4095),
                TokenKind::Integer(1),
                TokenKind::Integer(63),
                TokenKind::Integer(9),
                TokenKind::Integer(7),
                TokenKind::Integer(1),
                TokenKind::IDouble(4.0),
                TokenKind::IDouble(2.0),
                TokenKind::IDouble(5.6),
            ]
        );
    }

    #[test]
    fn test_double_by_fraction_and_exponent() {
        assert_eq!(lex_num("3.25"), TokenKind::Double(3.25));
        assert_eq!(lex_num("1e3"), TokenKind::Double(1000.0));
        assert_eq!(lex_num("2.5e-3"), TokenKind::Double(0.0025));
        assert_eq!(lex_num("2E+2"), TokenKind::Double(200.0));
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(lex_num("3f"), TokenKind::Float(3.0));
        assert_eq!(lex_num("3d"), TokenKind::Double(3.0));
        assert_eq!(lex_num("6.9f"), TokenKind::Float(6.9));
        assert_eq!(lex_num("3u"), TokenKind::Uinteger(3));
        assert_eq!(lex_num("29U"), TokenKind::Uinteger(29));
        assert_eq!(lex_num("4i"), TokenKind::IDouble(4.0));
        assert_eq!(lex_num("4if"), TokenKind::IFloat(4.0));
        assert_eq!(lex_num("2.5if"), TokenKind::IFloat(2.5));
        assert_eq!(lex_num("65b"), TokenKind::Byte(65));
        assert_eq!(lex_num("0b"), TokenKind::Byte(0));
    }

    #[test]
    fn test_hex_fraction() {
        assert_eq!(lex_num("0x1.8"), TokenKind::Double(1.5));
        assert_eq!(lex_num("0b0.1"), TokenKind::Double(0.5));
    }

    #[test]
    fn test_exponent_needs_digits() {
        // `2e` is an integer followed by an identifier.
        let (kinds, handler) = lex_kinds("2e");
        assert!(!handler.has_errors());
        assert_eq!(kinds.len(), 2);
        assert_eq!(kinds[0], TokenKind::Integer(2));
    }

    #[test]
    fn test_no_digits_after_prefix() {
        let (kinds, handler) = lex_kinds("0x");
        assert!(handler.has_errors());
        assert_eq!(kinds[0], TokenKind::Integer(0));
    }

    #[test]
    fn test_byte_out_of_range() {
        let (kinds, handler) = lex_kinds("256b");
        assert!(handler.has_errors());
        assert!(matches!(kinds[0], TokenKind::Byte(_)));
    }

    #[test]
    fn test_overflow_wraps_modulo_128_bits() {
        // 2^128 wraps to 0 and reports a diagnostic.
        let (kinds, handler) = lex_kinds("340282366920938463463374607431768211456");
        assert!(handler.has_errors());
        assert_eq!(kinds[0], TokenKind::Integer(0));
    }

    #[test]
    fn test_max_u128_is_exact() {
        let (kinds, handler) = lex_kinds("340282366920938463463374607431768211455u");
        assert!(!handler.has_errors());
        assert_eq!(kinds[0], TokenKind::Uinteger(u128::MAX));
    }

    #[test]
    fn test_range_is_not_a_fraction() {
        // `1..2` keeps the range operator intact.
        let (kinds, handler) = lex_kinds("1..2");
        assert!(!handler.has_errors());
        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds[0], TokenKind::Integer(1));
        assert_eq!(kinds[2], TokenKind::Integer(2));
    }
}
