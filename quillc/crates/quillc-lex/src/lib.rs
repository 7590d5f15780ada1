//! quillc-lex - lexical analysis for the Quill language.
//!
//! Transforms a decoded source buffer into a token vector terminated by
//! `Eof`. The lexer is total: any input produces a token stream, with
//! malformed regions reported into the shared diagnostic sink as
//! `Invalid` tokens. At most two scalars of lookahead are ever needed.
//!
//! ```
//! use quillc_lex::{lex, TokenKind};
//! use quillc_util::{Handler, SourceBuffer};
//!
//! let source = SourceBuffer::new("hello.qll", "def main() {\n}");
//! let handler = Handler::new();
//! let tokens = lex(&source, &handler);
//!
//! assert!(!handler.has_errors());
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
//! ```

pub mod cursor;
mod edge_cases;
mod lexer;
pub mod token;
pub mod unicode;

pub use cursor::Cursor;
pub use lexer::{lex, Lexer};
pub use token::{keyword_from_word, Delimiter, Keyword, Operator, Token, TokenKind};
