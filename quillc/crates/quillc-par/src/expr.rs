//! Expression parsing by precedence climbing.
//!
//! One function per precedence level, lowest binding first:
//!
//! assignment/range -> ternary -> `or` -> `xor` -> `and` -> `not` ->
//! comparison chain -> `|` -> `~` (binary xor) -> `&` -> shifts ->
//! additive -> multiplicative (including element-wise `.`) -> prefix
//! unary -> `^` (right-associative) -> postfix -> primary.
//!
//! There is no backtracking: the current token (with one token of
//! lookahead for `.name` and `!(`) decides every rule.

use quillc_lex::{Delimiter, Keyword, Operator, TokenKind};

use crate::ast::*;
use crate::Parser;

/// Postfix suffix selector, decided by one token (plus one of lookahead
/// for `.` and `!`).
enum Suffix {
    Call,
    Index,
    Dot,
    Exclamation,
}

impl<'a> Parser<'a> {
    /// Parses a complete expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_assignment()
    }

    /// Level 1: `=`, the augmented assignments, and `..`. All
    /// right-associative.
    fn parse_assignment(&mut self) -> Option<Expr> {
        let left = self.parse_ternary()?;

        let op = match self.current().kind {
            TokenKind::Operator(Operator::Assign) => BinaryOp::Assign,
            TokenKind::Operator(Operator::Range) => BinaryOp::Range,
            TokenKind::Operator(Operator::IpAdd) => BinaryOp::IpAdd,
            TokenKind::Operator(Operator::IpSub) => BinaryOp::IpSub,
            TokenKind::Operator(Operator::IpMul) => BinaryOp::IpMul,
            TokenKind::Operator(Operator::IpDiv) => BinaryOp::IpDiv,
            TokenKind::Operator(Operator::IpMod) => BinaryOp::IpMod,
            TokenKind::Operator(Operator::IpDot) => BinaryOp::IpDot,
            TokenKind::Operator(Operator::IpPow) => BinaryOp::IpPow,
            TokenKind::Operator(Operator::IpBitAnd) => BinaryOp::IpBitAnd,
            TokenKind::Operator(Operator::IpBitOr) => BinaryOp::IpBitOr,
            TokenKind::Operator(Operator::IpBitXor) => BinaryOp::IpBitXor,
            TokenKind::Operator(Operator::IpBitLshift) => BinaryOp::IpBitLshift,
            TokenKind::Operator(Operator::IpBitRshift) => BinaryOp::IpBitRshift,
            _ => return Some(left),
        };
        self.advance();
        let right = self.parse_assignment()?;
        Some(Self::binary(op, left, right))
    }

    /// Level 2: `value if condition else otherwise`, right-associative.
    fn parse_ternary(&mut self) -> Option<Expr> {
        let value = self.parse_or()?;

        if self.match_keyword(Keyword::If) {
            let condition = self.parse_or()?;
            self.expect_keyword(Keyword::Else, "in a conditional expression")?;
            let otherwise = self.parse_ternary()?;
            let begin = value.begin;
            let end = otherwise.end;
            return Some(Expr::new(
                ExprKind::Ternary(Ternary {
                    condition: Box::new(condition),
                    value: Box::new(value),
                    otherwise: Box::new(otherwise),
                }),
                begin,
                end,
            ));
        }

        Some(value)
    }

    /// Level 3: `or`.
    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_xor()?;
        while self.match_operator(Operator::Or) {
            let right = self.parse_xor()?;
            left = Self::binary(BinaryOp::Or, left, right);
        }
        Some(left)
    }

    /// Level 4: `xor`.
    fn parse_xor(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.match_operator(Operator::Xor) {
            let right = self.parse_and()?;
            left = Self::binary(BinaryOp::Xor, left, right);
        }
        Some(left)
    }

    /// Level 5: `and`.
    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_not()?;
        while self.match_operator(Operator::And) {
            let right = self.parse_not()?;
            left = Self::binary(BinaryOp::And, left, right);
        }
        Some(left)
    }

    /// Level 6: prefix `not`.
    fn parse_not(&mut self) -> Option<Expr> {
        if self.check_operator(Operator::Not) {
            let begin = self.begin_offset();
            self.advance();
            let operand = self.parse_not()?;
            let end = operand.end;
            return Some(Expr::new(
                ExprKind::Unary(Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                }),
                begin,
                end,
            ));
        }
        self.parse_comparison()
    }

    /// Level 7: the comparison chain.
    ///
    /// Any run of comparisons collapses into one node: `a < b <= c` has
    /// operations `[<, <=]` over operands `[a, b, c]`. A single
    /// comparison is a one-operation chain.
    fn parse_comparison(&mut self) -> Option<Expr> {
        let first = self.parse_bit_or()?;

        if self.comparison_op().is_none() {
            return Some(first);
        }

        let mut operations = Vec::new();
        let mut operands = vec![first];
        while let Some(op) = self.comparison_op() {
            self.advance();
            operations.push(op);
            operands.push(self.parse_bit_or()?);
        }

        let begin = operands.first().map(|e| e.begin).unwrap_or(0);
        let end = operands.last().map(|e| e.end).unwrap_or(begin);
        Some(Expr::new(
            ExprKind::Comparison(Comparison {
                operations,
                operands,
            }),
            begin,
            end,
        ))
    }

    fn comparison_op(&mut self) -> Option<ComparisonOp> {
        match self.current().kind {
            TokenKind::Operator(Operator::Equal) => Some(ComparisonOp::Equal),
            TokenKind::Operator(Operator::Unequal) => Some(ComparisonOp::Unequal),
            TokenKind::Operator(Operator::Less) => Some(ComparisonOp::Less),
            TokenKind::Operator(Operator::Greater) => Some(ComparisonOp::Greater),
            TokenKind::Operator(Operator::LessEqual) => Some(ComparisonOp::LessEqual),
            TokenKind::Operator(Operator::GreaterEqual) => Some(ComparisonOp::GreaterEqual),
            _ => None,
        }
    }

    /// Level 8: `|`.
    fn parse_bit_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_bit_xor()?;
        while self.match_operator(Operator::BitOr) {
            let right = self.parse_bit_xor()?;
            left = Self::binary(BinaryOp::BitOr, left, right);
        }
        Some(left)
    }

    /// Level 9: binary `~`, which is bit-xor in infix position.
    fn parse_bit_xor(&mut self) -> Option<Expr> {
        let mut left = self.parse_bit_and()?;
        while self.match_operator(Operator::BitNot) {
            let right = self.parse_bit_and()?;
            left = Self::binary(BinaryOp::BitXor, left, right);
        }
        Some(left)
    }

    /// Level 10: `&`.
    fn parse_bit_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_shift()?;
        while self.match_operator(Operator::BitAnd) {
            let right = self.parse_shift()?;
            left = Self::binary(BinaryOp::BitAnd, left, right);
        }
        Some(left)
    }

    /// Level 11: `<<` and `>>`.
    fn parse_shift(&mut self) -> Option<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Operator(Operator::BitLshift) => BinaryOp::BitLshift,
                TokenKind::Operator(Operator::BitRshift) => BinaryOp::BitRshift,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Self::binary(op, left, right);
        }
        Some(left)
    }

    /// Level 12: `+` and `-`.
    fn parse_additive(&mut self) -> Option<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Operator(Operator::Add) => BinaryOp::Add,
                TokenKind::Operator(Operator::Sub) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Self::binary(op, left, right);
        }
        Some(left)
    }

    /// Level 13: `*`, `/`, `%`, and the element-wise `.`.
    ///
    /// A dot only reaches this level when the postfix pass declined it,
    /// which means no identifier follows - that is exactly the
    /// element-wise multiply position.
    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Operator(Operator::Mul) => BinaryOp::Mul,
                TokenKind::Operator(Operator::Div) => BinaryOp::Div,
                TokenKind::Operator(Operator::Mod) => BinaryOp::Mod,
                TokenKind::Delimiter(Delimiter::Dot) => BinaryOp::Dot,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Self::binary(op, left, right);
        }
        Some(left)
    }

    /// Level 14: prefix `+`, `-`, `~`.
    fn parse_unary(&mut self) -> Option<Expr> {
        let op = match self.current().kind {
            TokenKind::Operator(Operator::Add) => UnaryOp::Positive,
            TokenKind::Operator(Operator::Sub) => UnaryOp::Negative,
            TokenKind::Operator(Operator::BitNot) => UnaryOp::BitNot,
            _ => return self.parse_pow(),
        };
        let begin = self.begin_offset();
        self.advance();
        let operand = self.parse_unary()?;
        let end = operand.end;
        Some(Expr::new(
            ExprKind::Unary(Unary {
                op,
                operand: Box::new(operand),
            }),
            begin,
            end,
        ))
    }

    /// Level 15: `^`, right-associative; the exponent re-enters at the
    /// prefix level so `x ^ -y` works and `-x ^ 2` negates the power.
    fn parse_pow(&mut self) -> Option<Expr> {
        let base = self.parse_postfix()?;
        if self.match_operator(Operator::Pow) {
            let exponent = self.parse_unary()?;
            return Some(Self::binary(BinaryOp::Pow, base, exponent));
        }
        Some(base)
    }

    /// Level 16: postfix call, index, member scope, templatize.
    pub(crate) fn parse_postfix(&mut self) -> Option<Expr> {
        let mut value = self.parse_primary()?;

        loop {
            let suffix = match self.current().kind {
                TokenKind::Delimiter(Delimiter::ParenOpen) => Suffix::Call,
                TokenKind::Delimiter(Delimiter::SquareOpen) => Suffix::Index,
                TokenKind::Delimiter(Delimiter::Dot) => Suffix::Dot,
                TokenKind::Delimiter(Delimiter::Exclamation) => Suffix::Exclamation,
                _ => break,
            };

            match suffix {
                Suffix::Call => {
                    let (arguments, end) = self.parse_grouped_arguments(
                        Delimiter::ParenOpen,
                        Delimiter::ParenClose,
                    )?;
                    let begin = value.begin;
                    value = Expr::new(
                        ExprKind::Call(Call {
                            callee: Box::new(value),
                            arguments,
                        }),
                        begin,
                        end,
                    );
                },
                Suffix::Index => {
                    let (arguments, end) = self.parse_grouped_arguments(
                        Delimiter::SquareOpen,
                        Delimiter::SquareClose,
                    )?;
                    let begin = value.begin;
                    value = Expr::new(
                        ExprKind::Index(Index {
                            indexee: Box::new(value),
                            arguments,
                        }),
                        begin,
                        end,
                    );
                },
                Suffix::Dot => {
                    // Only `.identifier` is a scope access; any other
                    // dot is the element-wise operator, handled at the
                    // multiplicative level.
                    if !matches!(self.peek_kind(1), TokenKind::Identifier(_)) {
                        break;
                    }
                    self.advance(); // `.`
                    let name = self.expect_identifier("after `.`")?;
                    let end = self.end_offset();
                    // Consecutive accesses extend one scope node.
                    if let ExprKind::Scope(scope) = &mut value.kind {
                        scope.names.push(name);
                        value.end = end;
                    } else {
                        let begin = value.begin;
                        value = Expr::new(
                            ExprKind::Scope(Scope {
                                value: Box::new(value),
                                names: vec![name],
                            }),
                            begin,
                            end,
                        );
                    }
                },
                Suffix::Exclamation => {
                    if !matches!(self.peek_kind(1), TokenKind::Delimiter(Delimiter::ParenOpen)) {
                        self.error_at_current(
                            "`!` must be followed by `(` to apply template arguments".to_owned(),
                        );
                        return None;
                    }
                    self.advance(); // `!`
                    let (arguments, end) = self.parse_grouped_arguments(
                        Delimiter::ParenOpen,
                        Delimiter::ParenClose,
                    )?;
                    let begin = value.begin;
                    value = Expr::new(
                        ExprKind::Templatize(Templatize {
                            value: Box::new(value),
                            arguments,
                        }),
                        begin,
                        end,
                    );
                },
            }
        }

        Some(value)
    }

    /// Parses a comma-separated argument list between `open` and
    /// `close`, returning the arguments and the end offset of the
    /// closer. Newlines inside are insignificant; a trailing comma is
    /// allowed.
    pub(crate) fn parse_grouped_arguments(
        &mut self,
        open: Delimiter,
        close: Delimiter,
    ) -> Option<(Vec<Expr>, usize)> {
        let open_span = self.current().span();
        self.expect_delimiter(open, "to open the argument list")?;
        self.enter_group();

        let mut arguments = Vec::new();
        loop {
            if self.match_delimiter(close) {
                break;
            }
            if self.at_end() {
                self.error_at(open_span, format!("unclosed `{open}`"));
                self.exit_group();
                return None;
            }
            arguments.push(self.parse_expression()?);
            if !self.match_delimiter(Delimiter::Comma) {
                if !self.match_delimiter(close) {
                    if self.at_end() {
                        // Unclosed bracket at EOF reports at the opener.
                        self.error_at(open_span, format!("unclosed `{open}`"));
                    } else {
                        self.error_at_current(format!(
                            "expected `,` or `{close}` in argument list"
                        ));
                    }
                    self.exit_group();
                    return None;
                }
                break;
            }
        }

        self.exit_group();
        Some((arguments, self.end_offset()))
    }

    /// Level 17: primary expressions.
    fn parse_primary(&mut self) -> Option<Expr> {
        let begin = self.begin_offset();
        let kind = match self.current().kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                ExprKind::Identifier(name)
            },
            TokenKind::Char(value) => {
                self.advance();
                ExprKind::Char(value)
            },
            TokenKind::String(value) => {
                self.advance();
                ExprKind::String(value)
            },
            TokenKind::Buffer(value) => {
                self.advance();
                ExprKind::Buffer(value)
            },
            TokenKind::Byte(value) => {
                self.advance();
                ExprKind::Byte(value)
            },
            TokenKind::Integer(value) => {
                self.advance();
                ExprKind::Integer(value)
            },
            TokenKind::Uinteger(value) => {
                self.advance();
                ExprKind::Uinteger(value)
            },
            TokenKind::Float(value) => {
                self.advance();
                ExprKind::Float(value)
            },
            TokenKind::Double(value) => {
                self.advance();
                ExprKind::Double(value)
            },
            TokenKind::IFloat(value) => {
                self.advance();
                ExprKind::IFloat(value)
            },
            TokenKind::IDouble(value) => {
                self.advance();
                ExprKind::IDouble(value)
            },
            TokenKind::Delimiter(Delimiter::Ellipsis) => {
                self.advance();
                ExprKind::Ellipsis
            },
            TokenKind::Delimiter(Delimiter::ParenOpen) => return self.parse_tuple_or_group(),
            TokenKind::Delimiter(Delimiter::SquareOpen) => return self.parse_array(),
            TokenKind::Delimiter(Delimiter::CurlyOpen) => return self.parse_dict(),
            TokenKind::Keyword(Keyword::Def) => return self.parse_signature_or_lambda(),
            TokenKind::Invalid => {
                self.advance();
                self.error_at(
                    self.tokens_span_at(begin),
                    "cannot parse an expression from invalid input".to_owned(),
                );
                return None;
            },
            kind => {
                self.error_at_current(format!("expected an expression, found {kind}"));
                return None;
            },
        };
        Some(Expr::new(kind, begin, self.end_offset()))
    }

    fn tokens_span_at(&self, begin: usize) -> quillc_util::Span {
        quillc_util::Span::new(begin, self.end_offset().max(begin))
    }

    /// `()` unit tuple, `(e)` grouping, `(e,)`/`(e, f)` tuple.
    fn parse_tuple_or_group(&mut self) -> Option<Expr> {
        let begin = self.begin_offset();
        self.advance(); // `(`
        self.enter_group();

        if self.match_delimiter(Delimiter::ParenClose) {
            self.exit_group();
            return Some(Expr::new(
                ExprKind::Tuple(Vec::new()),
                begin,
                self.end_offset(),
            ));
        }

        let first = self.parse_expression()?;

        if self.match_delimiter(Delimiter::Comma) {
            let mut values = vec![first];
            loop {
                if self.match_delimiter(Delimiter::ParenClose) {
                    break;
                }
                values.push(self.parse_expression()?);
                if !self.match_delimiter(Delimiter::Comma) {
                    self.expect_delimiter(Delimiter::ParenClose, "to close the tuple")?;
                    break;
                }
            }
            self.exit_group();
            return Some(Expr::new(
                ExprKind::Tuple(values),
                begin,
                self.end_offset(),
            ));
        }

        self.expect_delimiter(Delimiter::ParenClose, "to close the parenthesized expression")?;
        self.exit_group();

        // Grouping: the inner expression, widened over the parentheses.
        let mut inner = first;
        inner.begin = begin;
        inner.end = self.end_offset();
        Some(inner)
    }

    /// `[a, b, c]` array literal.
    fn parse_array(&mut self) -> Option<Expr> {
        let begin = self.begin_offset();
        let (values, end) =
            self.parse_grouped_arguments(Delimiter::SquareOpen, Delimiter::SquareClose)?;
        Some(Expr::new(ExprKind::Array(values), begin, end))
    }

    /// `{k: v, …}` dict literal, `{}` empty dict.
    fn parse_dict(&mut self) -> Option<Expr> {
        let begin = self.begin_offset();
        self.advance(); // `{`
        self.enter_group();

        let mut keys = Vec::new();
        let mut values = Vec::new();
        loop {
            if self.match_delimiter(Delimiter::CurlyClose) {
                break;
            }
            if self.at_end() {
                self.error_at_current("expected `}` to close the dict literal".to_owned());
                self.exit_group();
                return None;
            }
            keys.push(self.parse_expression()?);
            self.expect_delimiter(Delimiter::Colon, "between dict key and value")?;
            values.push(self.parse_expression()?);
            if !self.match_delimiter(Delimiter::Comma) {
                self.expect_delimiter(Delimiter::CurlyClose, "to close the dict literal")?;
                break;
            }
        }

        self.exit_group();
        Some(Expr::new(
            ExprKind::Dict(Dict { keys, values }),
            begin,
            self.end_offset(),
        ))
    }

    /// Builds a binary node spanning both operands.
    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        let begin = left.begin;
        let end = right.end;
        Expr::new(
            ExprKind::Binary(Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }),
            begin,
            end,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use quillc_lex::lex;
    use quillc_util::{Handler, SourceBuffer, Symbol};

    /// Parses a single expression statement.
    fn parse_expr(source: &str) -> Expr {
        let handler = Handler::new();
        let buffer = SourceBuffer::new("test.qll", source);
        let tokens = lex(&buffer, &handler);
        let ast = parse(&tokens, &handler);
        assert!(
            !handler.has_errors(),
            "unexpected diagnostics for {source:?}: {:?}",
            handler.diagnostics()
        );
        assert_eq!(ast.len(), 1);
        match ast.into_iter().next().unwrap().kind {
            StmtKind::Expression(expr) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn parse_err(source: &str) -> Handler {
        let handler = Handler::new();
        let buffer = SourceBuffer::new("test.qll", source);
        let tokens = lex(&buffer, &handler);
        let _ = parse(&tokens, &handler);
        assert!(handler.has_errors(), "expected diagnostics for {source:?}");
        handler
    }

    fn binary_op(expr: &Expr) -> BinaryOp {
        match &expr.kind {
            ExprKind::Binary(binary) => binary.op,
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_expr("42").kind, ExprKind::Integer(42));
        assert_eq!(parse_expr("4.5").kind, ExprKind::Double(4.5));
        assert_eq!(parse_expr("'x'").kind, ExprKind::Char('x'));
        assert_eq!(parse_expr("\"s\"").kind, ExprKind::String("s".to_owned()));
        assert_eq!(parse_expr("...").kind, ExprKind::Ellipsis);
    }

    #[test]
    fn test_mul_binds_tighter_than_add() {
        let expr = parse_expr("a + b * c");
        assert_eq!(binary_op(&expr), BinaryOp::Add);
        let ExprKind::Binary(binary) = expr.kind else { unreachable!() };
        assert_eq!(binary_op(&binary.right), BinaryOp::Mul);
    }

    #[test]
    fn test_add_is_left_associative() {
        let expr = parse_expr("a - b - c");
        assert_eq!(binary_op(&expr), BinaryOp::Sub);
        let ExprKind::Binary(binary) = expr.kind else { unreachable!() };
        assert_eq!(binary_op(&binary.left), BinaryOp::Sub);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let expr = parse_expr("a = b = c");
        assert_eq!(binary_op(&expr), BinaryOp::Assign);
        let ExprKind::Binary(binary) = expr.kind else { unreachable!() };
        assert_eq!(binary_op(&binary.right), BinaryOp::Assign);
    }

    #[test]
    fn test_augmented_assignments() {
        assert_eq!(binary_op(&parse_expr("a += b")), BinaryOp::IpAdd);
        assert_eq!(binary_op(&parse_expr("a .= b")), BinaryOp::IpDot);
        assert_eq!(binary_op(&parse_expr("a ~= b")), BinaryOp::IpBitXor);
        assert_eq!(binary_op(&parse_expr("a <<= b")), BinaryOp::IpBitLshift);
    }

    #[test]
    fn test_range() {
        assert_eq!(binary_op(&parse_expr("1 .. 10")), BinaryOp::Range);
    }

    #[test]
    fn test_logical_ladder() {
        // or is looser than xor is looser than and.
        let expr = parse_expr("a or b xor c and d");
        assert_eq!(binary_op(&expr), BinaryOp::Or);
        let ExprKind::Binary(binary) = expr.kind else { unreachable!() };
        assert_eq!(binary_op(&binary.right), BinaryOp::Xor);
    }

    #[test]
    fn test_not_above_comparison() {
        // `not a == b` is `not (a == b)`.
        let expr = parse_expr("not a == b");
        let ExprKind::Unary(unary) = expr.kind else {
            panic!("expected unary not");
        };
        assert_eq!(unary.op, UnaryOp::Not);
        assert!(matches!(unary.operand.kind, ExprKind::Comparison(_)));
    }

    #[test]
    fn test_double_not() {
        let expr = parse_expr("not not a");
        let ExprKind::Unary(outer) = expr.kind else { panic!() };
        assert!(matches!(outer.operand.kind, ExprKind::Unary(_)));
    }

    #[test]
    fn test_single_comparison_is_a_chain() {
        let expr = parse_expr("a == b");
        let ExprKind::Comparison(comparison) = expr.kind else {
            panic!("expected comparison");
        };
        assert_eq!(comparison.operations, vec![ComparisonOp::Equal]);
        assert_eq!(comparison.operands.len(), 2);
    }

    #[test]
    fn test_comparison_chain_collects() {
        let expr = parse_expr("a < b <= c == d");
        let ExprKind::Comparison(comparison) = expr.kind else {
            panic!("expected comparison");
        };
        assert_eq!(
            comparison.operations,
            vec![
                ComparisonOp::Less,
                ComparisonOp::LessEqual,
                ComparisonOp::Equal
            ]
        );
        assert_eq!(comparison.operands.len(), 4);
        assert_eq!(comparison.operations.len() + 1, comparison.operands.len());
    }

    #[test]
    fn test_bitwise_ladder() {
        // `a | b ~ c & d` is `a | (b ~ (c & d))`.
        let expr = parse_expr("a | b ~ c & d");
        assert_eq!(binary_op(&expr), BinaryOp::BitOr);
        let ExprKind::Binary(binary) = expr.kind else { unreachable!() };
        assert_eq!(binary_op(&binary.right), BinaryOp::BitXor);
    }

    #[test]
    fn test_shift_looser_than_additive() {
        let expr = parse_expr("a + b << c");
        assert_eq!(binary_op(&expr), BinaryOp::BitLshift);
    }

    #[test]
    fn test_tilde_prefix_is_bit_not() {
        let expr = parse_expr("~mask");
        let ExprKind::Unary(unary) = expr.kind else { panic!() };
        assert_eq!(unary.op, UnaryOp::BitNot);
    }

    #[test]
    fn test_tilde_infix_is_bit_xor() {
        assert_eq!(binary_op(&parse_expr("a ~ b")), BinaryOp::BitXor);
    }

    #[test]
    fn test_mixed_tilde() {
        // `a ~ ~b` - xor of a with bit-not of b.
        let expr = parse_expr("a ~ ~b");
        assert_eq!(binary_op(&expr), BinaryOp::BitXor);
        let ExprKind::Binary(binary) = expr.kind else { unreachable!() };
        assert!(matches!(binary.right.kind, ExprKind::Unary(_)));
    }

    #[test]
    fn test_element_wise_dot() {
        // Dot before a non-identifier is the element-wise multiply.
        let expr = parse_expr("a . (b)");
        assert_eq!(binary_op(&expr), BinaryOp::Dot);
    }

    #[test]
    fn test_dot_before_identifier_is_scope() {
        let expr = parse_expr("a.b.c");
        let ExprKind::Scope(scope) = expr.kind else {
            panic!("expected scope");
        };
        assert_eq!(
            scope.names,
            vec![Symbol::intern("b"), Symbol::intern("c")]
        );
        assert_eq!(
            scope.value.kind,
            ExprKind::Identifier(Symbol::intern("a"))
        );
    }

    #[test]
    fn test_pow_right_associative() {
        let expr = parse_expr("a ^ b ^ c");
        assert_eq!(binary_op(&expr), BinaryOp::Pow);
        let ExprKind::Binary(binary) = expr.kind else { unreachable!() };
        assert_eq!(binary_op(&binary.right), BinaryOp::Pow);
    }

    #[test]
    fn test_pow_binds_tighter_than_unary() {
        // `-x ^ 2` is `-(x ^ 2)`.
        let expr = parse_expr("-x ^ 2");
        let ExprKind::Unary(unary) = expr.kind else { panic!() };
        assert_eq!(unary.op, UnaryOp::Negative);
        assert_eq!(binary_op(&unary.operand), BinaryOp::Pow);
    }

    #[test]
    fn test_unary_in_exponent() {
        let expr = parse_expr("x ^ -y");
        assert_eq!(binary_op(&expr), BinaryOp::Pow);
    }

    #[test]
    fn test_ternary() {
        let expr = parse_expr("a if c else b");
        let ExprKind::Ternary(ternary) = expr.kind else {
            panic!("expected ternary");
        };
        assert_eq!(ternary.value.kind, ExprKind::Identifier(Symbol::intern("a")));
        assert_eq!(
            ternary.condition.kind,
            ExprKind::Identifier(Symbol::intern("c"))
        );
        assert_eq!(
            ternary.otherwise.kind,
            ExprKind::Identifier(Symbol::intern("b"))
        );
    }

    #[test]
    fn test_ternary_right_associative() {
        // `a if c else b if d else e` nests in the otherwise branch.
        let expr = parse_expr("a if c else b if d else e");
        let ExprKind::Ternary(ternary) = expr.kind else { panic!() };
        assert!(matches!(ternary.otherwise.kind, ExprKind::Ternary(_)));
    }

    #[test]
    fn test_ternary_below_assignment() {
        let expr = parse_expr("x = a if c else b");
        assert_eq!(binary_op(&expr), BinaryOp::Assign);
        let ExprKind::Binary(binary) = expr.kind else { unreachable!() };
        assert!(matches!(binary.right.kind, ExprKind::Ternary(_)));
    }

    #[test]
    fn test_call_and_index() {
        let expr = parse_expr("f(a, b)[0]");
        let ExprKind::Index(index) = expr.kind else {
            panic!("expected index");
        };
        let ExprKind::Call(call) = &index.indexee.kind else {
            panic!("expected call");
        };
        assert_eq!(call.arguments.len(), 2);
        assert_eq!(index.arguments.len(), 1);
    }

    #[test]
    fn test_scope_call() {
        let expr = parse_expr("std.print(\"Hello, world!\")");
        let ExprKind::Call(call) = expr.kind else {
            panic!("expected call");
        };
        assert!(matches!(call.callee.kind, ExprKind::Scope(_)));
        assert_eq!(call.arguments.len(), 1);
    }

    #[test]
    fn test_templatize() {
        let expr = parse_expr("Map!(str, int)");
        let ExprKind::Templatize(templatize) = expr.kind else {
            panic!("expected templatize");
        };
        assert_eq!(templatize.arguments.len(), 2);
        assert_eq!(
            templatize.value.kind,
            ExprKind::Identifier(Symbol::intern("Map"))
        );
    }

    #[test]
    fn test_templatize_then_call() {
        let expr = parse_expr("make!(int)(3)");
        let ExprKind::Call(call) = expr.kind else {
            panic!("expected call");
        };
        assert!(matches!(call.callee.kind, ExprKind::Templatize(_)));
    }

    #[test]
    fn test_grouping_vs_tuple() {
        assert!(matches!(
            parse_expr("(a)").kind,
            ExprKind::Identifier(_)
        ));
        let ExprKind::Tuple(single) = parse_expr("(a,)").kind else {
            panic!("expected tuple");
        };
        assert_eq!(single.len(), 1);
        let ExprKind::Tuple(pair) = parse_expr("(a, b)").kind else {
            panic!("expected tuple");
        };
        assert_eq!(pair.len(), 2);
        let ExprKind::Tuple(unit) = parse_expr("()").kind else {
            panic!("expected tuple");
        };
        assert!(unit.is_empty());
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        let expr = parse_expr("(a + b) * c");
        assert_eq!(binary_op(&expr), BinaryOp::Mul);
    }

    #[test]
    fn test_array_and_dict() {
        let ExprKind::Array(values) = parse_expr("[1, 2, 3]").kind else {
            panic!("expected array");
        };
        assert_eq!(values.len(), 3);

        let ExprKind::Dict(dict) = parse_expr("{\"a\": 1, \"b\": 2}").kind else {
            panic!("expected dict");
        };
        assert_eq!(dict.keys.len(), 2);
        assert_eq!(dict.keys.len(), dict.values.len());

        let ExprKind::Dict(empty) = parse_expr("{}").kind else {
            panic!("expected dict");
        };
        assert!(empty.keys.is_empty());
    }

    #[test]
    fn test_expression_spans_cover_tokens() {
        let expr = parse_expr("a + b * c");
        assert_eq!(expr.begin, 0);
        assert_eq!(expr.end, 9);
        let grouped = parse_expr("(a + b)");
        assert_eq!(grouped.begin, 0);
        assert_eq!(grouped.end, 7);
    }

    #[test]
    fn test_bare_exclamation_is_an_error() {
        parse_err("a ! b");
    }

    #[test]
    fn test_missing_operand_is_an_error() {
        parse_err("a +");
    }

    #[test]
    fn test_unclosed_paren_is_an_error() {
        parse_err("f(a, b");
    }

    #[test]
    fn test_dict_requires_colon() {
        parse_err("{a, b}");
    }
}
