//! Statement parsing: dispatch, variable declarations, control flow,
//! and blocks.

use quillc_lex::{Delimiter, Keyword, Operator, TokenKind};
use quillc_util::Span;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses one statement. Never fails: a syntax error yields an
    /// `Invalid` statement after resynchronizing.
    pub(crate) fn parse_statement(&mut self) -> Stmt {
        let begin = self.begin_offset();
        match self.parse_statement_inner() {
            Some(stmt) => {
                self.finish_statement();
                stmt
            },
            None => {
                self.recover_to_statement_boundary();
                let end = self.end_offset().max(begin);
                Stmt::invalid(Span::new(begin, end))
            },
        }
    }

    /// Dispatches on the leading token.
    fn parse_statement_inner(&mut self) -> Option<Stmt> {
        match self.current().kind {
            TokenKind::Keyword(keyword) => match keyword {
                Keyword::Import => self.parse_import(),
                Keyword::Include => self.parse_include(),
                // `def name…` declares a function; `def (` is a
                // signature or lambda in expression position.
                Keyword::Def => {
                    if matches!(self.peek_kind(1), TokenKind::Delimiter(Delimiter::ParenOpen)) {
                        self.parse_expression_or_variable()
                    } else {
                        self.parse_function(false, false)
                    }
                },
                Keyword::Class => self.parse_class(false),
                Keyword::Struct => self.parse_struct(false),
                Keyword::Enum => self.parse_enum(),
                Keyword::Alias => self.parse_alias(false),
                Keyword::Incase | Keyword::Static => self.parse_attributed_declaration(),
                Keyword::Wild | Keyword::Ref => self.parse_variable_statement(false),
                Keyword::If => self.parse_if(),
                Keyword::While => self.parse_while(),
                Keyword::Do => self.parse_do_while(),
                Keyword::For => self.parse_for(),
                Keyword::Break => self.parse_break(),
                Keyword::Continue => self.parse_continue(),
                Keyword::Return => self.parse_return(),
                other => {
                    self.error_at_current(format!("unexpected keyword `{other}`"));
                    None
                },
            },
            _ => self.parse_expression_or_variable(),
        }
    }

    /// After a successful statement, consumes its terminator or reports
    /// the stray tokens before it.
    fn finish_statement(&mut self) {
        match self.current().kind {
            TokenKind::Newline | TokenKind::Delimiter(Delimiter::Semicolon) => self.advance(),
            TokenKind::Eof | TokenKind::Delimiter(Delimiter::CurlyClose) => {},
            ref kind => {
                let message = format!("expected end of statement, found {kind}");
                self.error_at_current(message);
                self.recover_to_statement_boundary();
            },
        }
    }

    // =========================================================================
    // ACCESS ATTRIBUTES
    // =========================================================================

    /// Parses `incase`/`static` prefixes and the declaration they apply
    /// to. The prefixes may appear in either order.
    fn parse_attributed_declaration(&mut self) -> Option<Stmt> {
        let attribute_begin = self.begin_offset();
        let mut is_incase = false;
        let mut is_static = false;
        loop {
            if self.check_keyword(Keyword::Incase) {
                if is_incase {
                    self.error_at_current("duplicate `incase` attribute".to_owned());
                }
                is_incase = true;
                self.advance();
            } else if self.check_keyword(Keyword::Static) {
                if is_static {
                    self.error_at_current("duplicate `static` attribute".to_owned());
                }
                is_static = true;
                self.advance();
            } else {
                break;
            }
        }
        let attribute_span = Span::new(attribute_begin, self.end_offset());

        let stmt = match self.current().kind {
            TokenKind::Keyword(Keyword::Def) => self.parse_function(is_incase, is_static),
            TokenKind::Keyword(Keyword::Class) => {
                self.reject_attribute(is_static, "static", "a class", attribute_span);
                self.parse_class(is_incase)
            },
            TokenKind::Keyword(Keyword::Struct) => {
                self.reject_attribute(is_static, "static", "a struct", attribute_span);
                self.parse_struct(is_incase)
            },
            TokenKind::Keyword(Keyword::Enum) => {
                self.reject_attribute(is_incase, "incase", "an enum", attribute_span);
                self.reject_attribute(is_static, "static", "an enum", attribute_span);
                self.parse_enum()
            },
            TokenKind::Keyword(Keyword::Alias) => {
                self.reject_attribute(is_static, "static", "an alias", attribute_span);
                self.parse_alias(is_incase)
            },
            _ => {
                self.reject_attribute(is_incase, "incase", "a variable", attribute_span);
                self.parse_variable_statement(is_static)
            },
        }?;

        // Attributes belong to the statement's extent.
        Some(Stmt::new(stmt.kind, attribute_begin.min(stmt.begin), stmt.end))
    }

    fn reject_attribute(&mut self, present: bool, attribute: &str, target: &str, span: Span) {
        if present {
            self.error_at(span, format!("`{attribute}` cannot be applied to {target}"));
        }
    }

    // =========================================================================
    // VARIABLE DECLARATIONS
    // =========================================================================

    /// Parses a variable statement that begins with `wild`, `ref`, a
    /// `static` attribute, or (via [`Self::parse_expression_or_variable`])
    /// a plain name or type.
    pub(crate) fn parse_variable_statement(&mut self, is_static: bool) -> Option<Stmt> {
        let begin = self.begin_offset();
        let is_wild = self.match_keyword(Keyword::Wild);
        let is_ref = self.match_keyword(Keyword::Ref);
        let flagged = is_static || is_wild || is_ref;

        let variable = self.parse_variable_body(is_static, is_wild, is_ref, flagged)?;
        Some(Stmt::new(
            StmtKind::Variable(variable),
            begin,
            self.end_offset(),
        ))
    }

    /// Parses the body of a variable declaration, after any flags.
    ///
    /// Accepted forms:
    /// - annotated:  `name : [ref] type [= initializer]`
    /// - flag-only:  `name [= initializer]` (requires a preceding flag,
    ///   otherwise a bare `name = …` is an assignment expression)
    /// - juxtaposed: `type name [= initializer]`
    fn parse_variable_body(
        &mut self,
        is_static: bool,
        is_wild: bool,
        mut is_ref: bool,
        flagged: bool,
    ) -> Option<Variable> {
        let begin = self.begin_offset();

        let (name, ty) = if matches!(self.current().kind, TokenKind::Identifier(_))
            && matches!(self.peek_kind(1), TokenKind::Delimiter(Delimiter::Colon))
        {
            let name = self.expect_identifier("as variable name")?;
            self.advance(); // `:`
            let (type_ref, ty) = self.parse_type()?;
            is_ref |= type_ref;
            (name, Some(ty))
        } else if flagged
            && matches!(self.current().kind, TokenKind::Identifier(_))
            && !self.juxtaposed_name_follows()
        {
            (self.expect_identifier("as variable name")?, None)
        } else {
            let ty = self.parse_type_expr()?;
            let name = self.expect_identifier("after the variable type")?;
            (name, Some(Box::new(ty)))
        };

        let initializer = if self.match_operator(Operator::Assign) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        let ty = match (ty, &initializer) {
            (None, None) if !is_wild => {
                let span = Span::new(begin, self.end_offset().max(begin));
                self.error_at(
                    span,
                    "variable declaration needs a type or an initializer".to_owned(),
                );
                Some(Box::new(Expr::invalid(span)))
            },
            (ty, _) => ty,
        };

        Some(Variable {
            is_static,
            is_wild,
            is_ref,
            name,
            ty,
            initializer,
        })
    }

    /// True when the token after the current identifier begins a
    /// juxtaposed `type name` declaration rather than ending the
    /// declarator.
    fn juxtaposed_name_follows(&mut self) -> bool {
        matches!(
            self.peek_kind(1),
            TokenKind::Identifier(_)
                | TokenKind::Delimiter(Delimiter::Dot)
                | TokenKind::Delimiter(Delimiter::Exclamation)
                | TokenKind::Delimiter(Delimiter::SquareOpen)
        )
    }

    /// Parses a statement that starts like an expression: either an
    /// expression statement or a juxtaposed `type name` declaration.
    fn parse_expression_or_variable(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();

        // `name : type` resolves as a declaration on two tokens.
        if matches!(self.current().kind, TokenKind::Identifier(_))
            && matches!(self.peek_kind(1), TokenKind::Delimiter(Delimiter::Colon))
        {
            let variable = self.parse_variable_body(false, false, false, false)?;
            return Some(Stmt::new(
                StmtKind::Variable(variable),
                begin,
                self.end_offset(),
            ));
        }

        let expr = self.parse_expression()?;

        // An identifier after a full expression is a juxtaposed
        // declaration: the expression was the type.
        if let TokenKind::Identifier(name) = self.current().kind {
            self.advance();
            let initializer = if self.match_operator(Operator::Assign) {
                Some(Box::new(self.parse_expression()?))
            } else {
                None
            };
            let variable = Variable {
                is_static: false,
                is_wild: false,
                is_ref: false,
                name,
                ty: Some(Box::new(expr)),
                initializer,
            };
            return Some(Stmt::new(
                StmtKind::Variable(variable),
                begin,
                self.end_offset(),
            ));
        }

        Some(Stmt::new(
            StmtKind::Expression(expr),
            begin,
            self.end_offset(),
        ))
    }

    // =========================================================================
    // CONTROL FLOW
    // =========================================================================

    /// `if c { } elif c { } else { }`, flattened into parallel arrays.
    fn parse_if(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `if`

        let mut branch_conditions = vec![self.parse_expression()?];
        let mut branch_blocks = vec![self.parse_block()?];

        while self.match_keyword(Keyword::Elif) {
            branch_conditions.push(self.parse_expression()?);
            branch_blocks.push(self.parse_block()?);
        }

        let else_block = if self.match_keyword(Keyword::Else) {
            if self.check_keyword(Keyword::If) {
                // `else if` nests a fresh if-branch statement.
                vec![self.parse_if()?]
            } else {
                self.parse_block()?
            }
        } else {
            Vec::new()
        };

        Some(Stmt::new(
            StmtKind::IfBranch(IfBranch {
                branch_conditions,
                branch_blocks,
                else_block,
            }),
            begin,
            self.end_offset(),
        ))
    }

    /// `while c { }`.
    fn parse_while(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `while`
        let condition = Box::new(self.parse_expression()?);
        let block = self.parse_block()?;
        Some(Stmt::new(
            StmtKind::WhileLoop(WhileLoop { condition, block }),
            begin,
            self.end_offset(),
        ))
    }

    /// `do { } while c` - the condition runs to the statement boundary.
    fn parse_do_while(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `do`
        let block = self.parse_block()?;
        self.expect_keyword(Keyword::While, "after the `do` block")?;
        let condition = Box::new(self.parse_expression()?);
        Some(Stmt::new(
            StmtKind::DoWhileLoop(DoWhileLoop { condition, block }),
            begin,
            self.end_offset(),
        ))
    }

    /// `for a, b in e { }`.
    fn parse_for(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `for`

        let mut iterators = vec![self.expect_identifier("as the loop iterator")?];
        while self.match_delimiter(Delimiter::Comma) {
            iterators.push(self.expect_identifier("as a loop iterator")?);
        }

        self.expect_keyword(Keyword::In, "after the loop iterators")?;
        let iteratee = Box::new(self.parse_expression()?);
        let block = self.parse_block()?;

        Some(Stmt::new(
            StmtKind::ForLoop(ForLoop {
                iterators,
                iteratee,
                block,
            }),
            begin,
            self.end_offset(),
        ))
    }

    fn parse_break(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance();
        Some(Stmt::new(StmtKind::Break, begin, self.end_offset()))
    }

    fn parse_continue(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance();
        Some(Stmt::new(StmtKind::Continue, begin, self.end_offset()))
    }

    /// `return [e (, e)*]` - multiple values are allowed.
    fn parse_return(&mut self) -> Option<Stmt> {
        let begin = self.begin_offset();
        self.advance(); // `return`

        let mut values = Vec::new();
        if !self.at_statement_boundary() {
            values.push(self.parse_expression()?);
            while self.match_delimiter(Delimiter::Comma) {
                values.push(self.parse_expression()?);
            }
        }

        Some(Stmt::new(
            StmtKind::Return(Return { values }),
            begin,
            self.end_offset(),
        ))
    }

    // =========================================================================
    // BLOCKS
    // =========================================================================

    /// Parses a `{ … }` statement block.
    ///
    /// Inside the braces, newline significance is restored even when the
    /// block appears nested in a bracket group (a lambda body in a call
    /// argument, for instance). An unclosed block reports one diagnostic
    /// and keeps the fragment parsed so far.
    pub(crate) fn parse_block(&mut self) -> Option<Vec<Stmt>> {
        self.expect_delimiter(Delimiter::CurlyOpen, "to open a block")?;

        let statements = self.with_statement_newlines(|parser| {
            let mut statements = Vec::new();
            loop {
                parser.skip_statement_separators();
                if parser.check_delimiter(Delimiter::CurlyClose) || parser.at_end() {
                    break;
                }
                let before = parser.position_index();
                statements.push(parser.parse_statement());
                if parser.position_index() == before {
                    parser.advance();
                }
            }
            if !parser.match_delimiter(Delimiter::CurlyClose) {
                parser.error_at_current("expected `}` to close the block".to_owned());
            }
            statements
        });

        Some(statements)
    }
}
