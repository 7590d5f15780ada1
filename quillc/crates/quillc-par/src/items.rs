//! Declaration parsing: imports, functions, classes, structs, enums,
//! and aliases.

use indexmap::IndexSet;
use quillc_lex::{Delimiter, Keyword, TokenKind};
use quillc_util::Symbol;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// `import a.b.c [as alias]`. A leading `.` marks a relative path.
    pub(crate) fn parse_import(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `import`

        let (path, relative) = self.parse_module_path()?;

        let alias = if self.match_keyword(Keyword::As) {
            Some(self.expect_identifier("after `as`")?)
        } else {
            None
        };

        Some(Stmt::new(
            StmtKind::Import(Import {
                path,
                relative,
                alias,
            }),
            begin,
            self.end_offset(),
        ))
    }

    /// `include a.b.c`, with the same path syntax as `import` but no
    /// alias.
    pub(crate) fn parse_include(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `include`

        let (path, relative) = self.parse_module_path()?;

        Some(Stmt::new(
            StmtKind::Include(Include { path, relative }),
            begin,
            self.end_offset(),
        ))
    }

    /// Dotted module path with an optional leading `.` for relative.
    fn parse_module_path(&mut self) -> Option<(Vec<Symbol>, bool)> {
        let relative = self.match_delimiter(Delimiter::Dot);

        let mut path = vec![self.expect_identifier("as the module name")?];
        while self.match_delimiter(Delimiter::Dot) {
            path.push(self.expect_identifier("in the module path")?);
        }
        Some((path, relative))
    }

    /// `def a.b!(T)(args) -> [ref] type { block }`.
    pub(crate) fn parse_function(&mut self, is_incase: bool, is_static: bool) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `def`

        // Dotted definition path, e.g. `def List.push`.
        let mut identifiers = vec![self.expect_identifier("after `def`")?];
        while self.match_delimiter(Delimiter::Dot) {
            identifiers.push(self.expect_identifier("in the definition path")?);
        }

        let template_parameters = self.parse_template_parameters()?;

        self.expect_delimiter(Delimiter::ParenOpen, "before the function arguments")?;
        let (arguments, variadic_argument) = self.parse_argument_list()?;

        let (is_return_type_ref, return_type) = if self.match_delimiter(Delimiter::Arrow) {
            let (is_ref, ty) = self.parse_type()?;
            (is_ref, Some(ty))
        } else {
            (false, None)
        };

        let block = self.parse_block()?;

        Some(Stmt::new(
            StmtKind::Function(Function {
                is_incase,
                is_static,
                identifiers,
                template_parameters,
                arguments,
                variadic_argument,
                is_return_type_ref,
                return_type,
                block,
            }),
            begin,
            self.end_offset(),
        ))
    }

    /// `class Name!(T) inherits Base { block }`.
    pub(crate) fn parse_class(&mut self, is_incase: bool) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `class`

        let name = self.expect_identifier("after `class`")?;
        let template_parameters = self.parse_template_parameters()?;

        let base_type = if self.match_keyword(Keyword::Inherits) {
            // The base is a templatizable type, e.g. `inherits Box!(T)`.
            Some(Box::new(self.parse_type_expr()?))
        } else {
            None
        };

        let block = self.parse_block()?;

        Some(Stmt::new(
            StmtKind::Class(Class {
                is_incase,
                name,
                template_parameters,
                base_type,
                block,
            }),
            begin,
            self.end_offset(),
        ))
    }

    /// `struct Name!(T) { block }`.
    pub(crate) fn parse_struct(&mut self, is_incase: bool) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `struct`

        let name = self.expect_identifier("after `struct`")?;
        let template_parameters = self.parse_template_parameters()?;
        let block = self.parse_block()?;

        Some(Stmt::new(
            StmtKind::Struct(Struct {
                is_incase,
                name,
                template_parameters,
                block,
            }),
            begin,
            self.end_offset(),
        ))
    }

    /// `enum Name { a, b, c }`. Members are separated by commas and/or
    /// newlines; values are implicitly 0..n-1. Duplicates are reported
    /// and dropped.
    pub(crate) fn parse_enum(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `enum`

        let name = self.expect_identifier("after `enum`")?;
        self.expect_delimiter(Delimiter::CurlyOpen, "to open the enum members")?;

        let mut members: IndexSet<Symbol> = IndexSet::new();
        loop {
            while matches!(self.current().kind, TokenKind::Newline)
                || self.check_delimiter(Delimiter::Comma)
            {
                self.advance();
            }
            if self.match_delimiter(Delimiter::CurlyClose) {
                break;
            }
            if self.at_end() {
                self.error_at_current("expected `}` to close the enum".to_owned());
                return None;
            }
            let span = self.current().span();
            let member = self.expect_identifier("as an enum member")?;
            if !members.insert(member) {
                self.error_at(span, format!("duplicate enum member `{member}`"));
            }
        }

        Some(Stmt::new(
            StmtKind::Enum(Enum {
                name,
                members: members.into_iter().collect(),
            }),
            begin,
            self.end_offset(),
        ))
    }

    /// `alias name = expression`.
    pub(crate) fn parse_alias(&mut self, is_incase: bool) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `alias`

        let name = self.expect_identifier("after `alias`")?;
        if !self.match_operator(quillc_lex::Operator::Assign) {
            self.error_at_current("expected `=` in the alias definition".to_owned());
            return None;
        }
        let expression = Box::new(self.parse_expression()?);

        Some(Stmt::new(
            StmtKind::Alias(Alias {
                is_incase,
                name,
                expression,
            }),
            begin,
            self.end_offset(),
        ))
    }
}
