//! Type-position parsing.
//!
//! Types are expressions restricted to the postfix level: names, scoped
//! names, templatized names, and the aggregate/signature primaries. A
//! leading `ref` in a type position never becomes an expression node; it
//! sets the ref flag of the enclosing variable or signature slot.
//!
//! `def(…)` in expression position resolves to a Lambda when a `{` block
//! follows the argument list (and optional return type), otherwise to a
//! Signature. The decision needs no backtracking: argument elements are
//! collected in a neutral form first.

use quillc_lex::{Delimiter, Keyword, Operator, TokenKind};
use quillc_util::{Span, Symbol};
use rustc_hash::FxHashSet;

use crate::ast::*;
use crate::Parser;

/// One element of a `def(…)` argument list before the lambda/signature
/// decision is made.
enum DefElement {
    /// `name: type` - only valid in a lambda.
    Named(Variable),
    /// A bare name, which is an argument name in a lambda and a type in
    /// a signature.
    Bare {
        is_ref: bool,
        is_wild: bool,
        name: Symbol,
        span: Span,
    },
    /// A type expression - only valid in a signature.
    Type { is_ref: bool, ty: Expr },
}

impl<'a> Parser<'a> {
    /// Parses `[ref] type`, returning the ref flag for the enclosing
    /// slot and the type expression.
    pub(crate) fn parse_type(&mut self) -> Option<(bool, Box<Expr>)> {
        let is_ref = self.match_keyword(Keyword::Ref);
        let ty = self.parse_type_expr()?;
        Some((is_ref, Box::new(ty)))
    }

    /// Parses a type expression: a postfix-level expression.
    pub(crate) fn parse_type_expr(&mut self) -> Option<Expr> {
        self.parse_postfix()
    }

    /// Parses `!(T, U)` template parameter names after a declaration
    /// name. Duplicates are reported and dropped.
    pub(crate) fn parse_template_parameters(&mut self) -> Option<Vec<Symbol>> {
        if !(self.check_delimiter(Delimiter::Exclamation)
            && matches!(self.peek_kind(1), TokenKind::Delimiter(Delimiter::ParenOpen)))
        {
            return Some(Vec::new());
        }
        self.advance(); // `!`
        self.advance(); // `(`
        self.enter_group();

        let mut seen = FxHashSet::default();
        let mut parameters = Vec::new();
        loop {
            if self.match_delimiter(Delimiter::ParenClose) {
                break;
            }
            let span = self.current().span();
            let name = match self.expect_identifier("as a template parameter") {
                Some(name) => name,
                None => {
                    self.exit_group();
                    return None;
                },
            };
            if seen.insert(name) {
                parameters.push(name);
            } else {
                self.error_at(span, format!("duplicate template parameter `{name}`"));
            }
            if !self.match_delimiter(Delimiter::Comma) {
                if !self.match_delimiter(Delimiter::ParenClose) {
                    self.error_at_current(
                        "expected `,` or `)` in template parameters".to_owned(),
                    );
                    self.exit_group();
                    return None;
                }
                break;
            }
        }

        self.exit_group();
        Some(parameters)
    }

    /// Parses a declaration argument list after its `(`, through the
    /// closing `)`. Arguments are variables in `[ref] [wild] name
    /// [: type] [= default]` form; a trailing `name...` is the variadic
    /// argument.
    pub(crate) fn parse_argument_list(
        &mut self,
    ) -> Option<(Vec<Variable>, Option<Box<Variable>>)> {
        self.enter_group();

        let mut arguments = Vec::new();
        let mut variadic: Option<Box<Variable>> = None;
        loop {
            if self.match_delimiter(Delimiter::ParenClose) {
                break;
            }
            if self.at_end() {
                self.error_at_current("expected `)` to close the argument list".to_owned());
                self.exit_group();
                return None;
            }

            let is_ref = self.match_keyword(Keyword::Ref);
            let is_wild = self.match_keyword(Keyword::Wild);
            let name_span = self.current().span();
            let name = match self.expect_identifier("as an argument name") {
                Some(name) => name,
                None => {
                    self.exit_group();
                    return None;
                },
            };

            if self.match_delimiter(Delimiter::Ellipsis) {
                let argument = Variable {
                    is_static: false,
                    is_wild,
                    is_ref,
                    name,
                    ty: None,
                    initializer: None,
                };
                if variadic.is_some() {
                    self.error_at(name_span, "only one variadic argument is allowed".to_owned());
                } else {
                    variadic = Some(Box::new(argument));
                }
                if !self.check_delimiter(Delimiter::ParenClose)
                    && !self.check_delimiter(Delimiter::Comma)
                {
                    self.error_at_current("expected `)` after the variadic argument".to_owned());
                }
            } else {
                let (type_ref, ty) = if self.match_delimiter(Delimiter::Colon) {
                    let (type_ref, ty) = self.parse_type()?;
                    (type_ref, Some(ty))
                } else {
                    (false, None)
                };
                let initializer = if self.match_operator(Operator::Assign) {
                    Some(Box::new(self.parse_expression()?))
                } else {
                    None
                };
                if variadic.is_some() {
                    self.error_at(
                        name_span,
                        "the variadic argument must come last".to_owned(),
                    );
                }
                arguments.push(Variable {
                    is_static: false,
                    is_wild,
                    is_ref: is_ref || type_ref,
                    name,
                    ty,
                    initializer,
                });
            }

            if !self.match_delimiter(Delimiter::Comma) {
                if !self.match_delimiter(Delimiter::ParenClose) {
                    self.error_at_current("expected `,` or `)` in the argument list".to_owned());
                    self.exit_group();
                    return None;
                }
                break;
            }
        }

        self.exit_group();
        Some((arguments, variadic))
    }

    /// Parses `def(…) [-> [ref] type]` in expression position and
    /// resolves it to a Lambda (a `{` block follows) or a Signature.
    pub(crate) fn parse_signature_or_lambda(&mut self) -> Option<Expr> {
        let begin = self.begin_offset();
        self.advance(); // `def`
        self.expect_delimiter(Delimiter::ParenOpen, "after `def` in an expression")?;
        self.enter_group();

        let mut elements = Vec::new();
        let mut variadic: Option<Box<Variable>> = None;
        loop {
            if self.match_delimiter(Delimiter::ParenClose) {
                break;
            }
            if self.at_end() {
                self.error_at_current("expected `)` in the `def` argument list".to_owned());
                self.exit_group();
                return None;
            }

            match self.parse_def_element(&mut variadic) {
                Some(element) => elements.extend(element),
                None => {
                    self.exit_group();
                    return None;
                },
            }

            if !self.match_delimiter(Delimiter::Comma) {
                if !self.match_delimiter(Delimiter::ParenClose) {
                    self.error_at_current(
                        "expected `,` or `)` in the `def` argument list".to_owned(),
                    );
                    self.exit_group();
                    return None;
                }
                break;
            }
        }
        self.exit_group();

        let (is_return_type_ref, return_type) = if self.match_delimiter(Delimiter::Arrow) {
            let (is_ref, ty) = self.parse_type()?;
            (is_ref, Some(ty))
        } else {
            (false, None)
        };

        if self.check_delimiter(Delimiter::CurlyOpen) {
            let arguments = self.lambda_arguments(elements);
            let block = self.parse_block()?;
            return Some(Expr::new(
                ExprKind::Lambda(Lambda {
                    arguments,
                    variadic_argument: variadic,
                    is_return_type_ref,
                    return_type,
                    block,
                }),
                begin,
                self.end_offset(),
            ));
        }

        let def_span = Span::new(begin, self.end_offset());
        let (are_arguments_refs, argument_types) =
            self.signature_arguments(elements, &variadic, def_span);
        Some(Expr::new(
            ExprKind::Signature(Signature {
                are_arguments_refs,
                argument_types,
                is_return_type_ref,
                return_type,
            }),
            begin,
            self.end_offset(),
        ))
    }

    /// Parses one `def(…)` element without deciding lambda vs signature.
    fn parse_def_element(
        &mut self,
        variadic: &mut Option<Box<Variable>>,
    ) -> Option<Vec<DefElement>> {
        let is_ref = self.match_keyword(Keyword::Ref);
        let is_wild = self.match_keyword(Keyword::Wild);
        let span = self.current().span();

        if let TokenKind::Identifier(name) = self.current().kind {
            match self.peek_kind(1) {
                TokenKind::Delimiter(Delimiter::Colon) => {
                    self.advance(); // name
                    self.advance(); // `:`
                    let (type_ref, ty) = self.parse_type()?;
                    return Some(vec![DefElement::Named(Variable {
                        is_static: false,
                        is_wild,
                        is_ref: is_ref || type_ref,
                        name,
                        ty: Some(ty),
                        initializer: None,
                    })]);
                },
                TokenKind::Delimiter(Delimiter::Ellipsis) => {
                    self.advance(); // name
                    self.advance(); // `...`
                    let argument = Variable {
                        is_static: false,
                        is_wild,
                        is_ref,
                        name,
                        ty: None,
                        initializer: None,
                    };
                    if variadic.is_some() {
                        self.error_at(
                            span,
                            "only one variadic argument is allowed".to_owned(),
                        );
                    } else {
                        *variadic = Some(Box::new(argument));
                    }
                    return Some(Vec::new());
                },
                TokenKind::Delimiter(Delimiter::Comma)
                | TokenKind::Delimiter(Delimiter::ParenClose) => {
                    self.advance(); // name
                    let end = self.end_offset();
                    return Some(vec![DefElement::Bare {
                        is_ref,
                        is_wild,
                        name,
                        span: Span::new(span.begin, end),
                    }]);
                },
                _ => {},
            }
        }

        if is_wild {
            self.error_at(span, "`wild` must be followed by an argument name".to_owned());
        }
        let ty = self.parse_type_expr()?;
        Some(vec![DefElement::Type { is_ref, ty }])
    }

    /// Resolves collected `def` elements as lambda arguments.
    fn lambda_arguments(&mut self, elements: Vec<DefElement>) -> Vec<Variable> {
        let mut arguments = Vec::new();
        for element in elements {
            match element {
                DefElement::Named(variable) => arguments.push(variable),
                DefElement::Bare {
                    is_ref,
                    is_wild,
                    name,
                    ..
                } => arguments.push(Variable {
                    is_static: false,
                    is_wild,
                    is_ref,
                    name,
                    ty: None,
                    initializer: None,
                }),
                DefElement::Type { ty, .. } => {
                    self.error_at(
                        ty.span(),
                        "expected an argument name in lambda arguments".to_owned(),
                    );
                },
            }
        }
        arguments
    }

    /// Resolves collected `def` elements as signature argument types.
    fn signature_arguments(
        &mut self,
        elements: Vec<DefElement>,
        variadic: &Option<Box<Variable>>,
        def_span: Span,
    ) -> (Vec<bool>, Vec<Expr>) {
        if let Some(variadic) = variadic {
            self.error_at(
                def_span,
                format!(
                    "variadic argument `{}` is not allowed in a function type",
                    variadic.name
                ),
            );
        }

        let mut are_refs = Vec::new();
        let mut types = Vec::new();
        for element in elements {
            match element {
                DefElement::Named(variable) => {
                    let span = variable
                        .ty
                        .as_ref()
                        .map(|ty| ty.span())
                        .unwrap_or(Span::DUMMY);
                    self.error_at(
                        span,
                        format!("argument `{}` cannot be named in a function type", variable.name),
                    );
                    if let Some(ty) = variable.ty {
                        are_refs.push(variable.is_ref);
                        types.push(*ty);
                    }
                },
                DefElement::Bare {
                    is_ref, name, span, ..
                } => {
                    are_refs.push(is_ref);
                    types.push(Expr::new(
                        ExprKind::Identifier(name),
                        span.begin,
                        span.end,
                    ));
                },
                DefElement::Type { is_ref, ty } => {
                    are_refs.push(is_ref);
                    types.push(ty);
                },
            }
        }
        (are_refs, types)
    }
}
