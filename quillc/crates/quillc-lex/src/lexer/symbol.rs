//! Operator and delimiter lexing by maximal munch.
//!
//! Two scalars of lookahead settle every case: `..` vs `...`, `<<` vs
//! `<<=`, `.` vs `.=`, `!` vs `!=`, `~` vs `~=`.

use crate::token::{Delimiter, Operator, Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes one operator or delimiter. The cursor is at a scalar known
    /// to start a symbol.
    pub(crate) fn lex_symbol(&mut self) -> Token {
        let c = self.cursor.current();
        self.cursor.advance();

        let kind = match c {
            ',' => TokenKind::Delimiter(Delimiter::Comma),
            ':' => TokenKind::Delimiter(Delimiter::Colon),
            ';' => TokenKind::Delimiter(Delimiter::Semicolon),
            '(' => TokenKind::Delimiter(Delimiter::ParenOpen),
            ')' => TokenKind::Delimiter(Delimiter::ParenClose),
            '{' => TokenKind::Delimiter(Delimiter::CurlyOpen),
            '}' => TokenKind::Delimiter(Delimiter::CurlyClose),
            '[' => TokenKind::Delimiter(Delimiter::SquareOpen),
            ']' => TokenKind::Delimiter(Delimiter::SquareClose),

            '.' => {
                if self.cursor.match_scalar('.') {
                    if self.cursor.match_scalar('.') {
                        TokenKind::Delimiter(Delimiter::Ellipsis)
                    } else {
                        TokenKind::Operator(Operator::Range)
                    }
                } else if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::IpDot)
                } else {
                    TokenKind::Delimiter(Delimiter::Dot)
                }
            },
            '!' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::Unequal)
                } else {
                    TokenKind::Delimiter(Delimiter::Exclamation)
                }
            },
            '-' => {
                if self.cursor.match_scalar('>') {
                    TokenKind::Delimiter(Delimiter::Arrow)
                } else if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::IpSub)
                } else {
                    TokenKind::Operator(Operator::Sub)
                }
            },
            '+' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::IpAdd)
                } else {
                    TokenKind::Operator(Operator::Add)
                }
            },
            '*' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::IpMul)
                } else {
                    TokenKind::Operator(Operator::Mul)
                }
            },
            '/' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::IpDiv)
                } else {
                    TokenKind::Operator(Operator::Div)
                }
            },
            '%' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::IpMod)
                } else {
                    TokenKind::Operator(Operator::Mod)
                }
            },
            '^' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::IpPow)
                } else {
                    TokenKind::Operator(Operator::Pow)
                }
            },
            '=' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::Equal)
                } else {
                    TokenKind::Operator(Operator::Assign)
                }
            },
            '<' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::LessEqual)
                } else if self.cursor.match_scalar('<') {
                    if self.cursor.match_scalar('=') {
                        TokenKind::Operator(Operator::IpBitLshift)
                    } else {
                        TokenKind::Operator(Operator::BitLshift)
                    }
                } else {
                    TokenKind::Operator(Operator::Less)
                }
            },
            '>' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::GreaterEqual)
                } else if self.cursor.match_scalar('>') {
                    if self.cursor.match_scalar('=') {
                        TokenKind::Operator(Operator::IpBitRshift)
                    } else {
                        TokenKind::Operator(Operator::BitRshift)
                    }
                } else {
                    TokenKind::Operator(Operator::Greater)
                }
            },
            '&' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::IpBitAnd)
                } else {
                    TokenKind::Operator(Operator::BitAnd)
                }
            },
            '|' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::IpBitOr)
                } else {
                    TokenKind::Operator(Operator::BitOr)
                }
            },
            '~' => {
                if self.cursor.match_scalar('=') {
                    TokenKind::Operator(Operator::IpBitXor)
                } else {
                    TokenKind::Operator(Operator::BitNot)
                }
            },

            _ => unreachable!("lex_symbol called on non-symbol scalar"),
        };
        self.token(kind)
    }
}
