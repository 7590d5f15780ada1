//! Edge case tests for quillc-par.

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse;
    use quillc_lex::lex;
    use quillc_util::{Handler, SourceBuffer};

    fn parse_source(source: &str) -> (Ast, Handler) {
        let handler = Handler::new();
        let buffer = SourceBuffer::new("edge.qll", source);
        let tokens = lex(&buffer, &handler);
        let ast = parse(&tokens, &handler);
        (ast, handler)
    }

    // ==================== RECOVERY ====================

    #[test]
    fn test_recovery_after_bad_expression() {
        let (ast, handler) = parse_source("x = = 3\ny = 4");
        assert!(handler.has_errors());
        assert_eq!(ast.len(), 2);
        assert_eq!(ast[0].kind, StmtKind::Invalid);
        assert!(matches!(ast[1].kind, StmtKind::Expression(_)));
    }

    #[test]
    fn test_recovery_inside_block() {
        let (ast, handler) = parse_source("def f() {\n ) bad\n good()\n}");
        assert!(handler.has_errors());
        let StmtKind::Function(function) = &ast[0].kind else {
            panic!("expected function");
        };
        // The bad line became an invalid statement; the good one parsed.
        assert!(function
            .block
            .iter()
            .any(|s| s.kind == StmtKind::Invalid));
        assert!(function
            .block
            .iter()
            .any(|s| matches!(s.kind, StmtKind::Expression(_))));
    }

    #[test]
    fn test_semicolon_resynchronizes_within_a_line() {
        let (ast, handler) = parse_source("] ; ok()");
        assert!(handler.has_errors());
        assert_eq!(ast.len(), 2);
        assert!(matches!(ast[1].kind, StmtKind::Expression(_)));
    }

    #[test]
    fn test_unclosed_paren_at_eof() {
        let (_, handler) = parse_source("f(a, b");
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn test_stray_closers_each_report() {
        let (ast, handler) = parse_source(")\n]\n}");
        assert!(handler.error_count() >= 3);
        assert!(ast.iter().all(|s| s.kind == StmtKind::Invalid));
    }

    #[test]
    fn test_invalid_tokens_still_parse_to_a_tree() {
        // `$` is not a Quill scalar: the lexer reports it and the parser
        // reports parsing around it, but both produce output.
        let (ast, handler) = parse_source("x = $\ny = 2");
        assert!(handler.has_errors());
        assert_eq!(ast.len(), 2);
    }

    #[test]
    fn test_deeply_nested_expression() {
        let mut source = String::new();
        for _ in 0..64 {
            source.push('(');
        }
        source.push('x');
        for _ in 0..64 {
            source.push(')');
        }
        let (ast, handler) = parse_source(&source);
        assert!(!handler.has_errors());
        assert_eq!(ast.len(), 1);
    }

    #[test]
    fn test_every_node_spans_within_source() {
        let source = "def f(x: T) -> ref T {\n if x > 0 { return x }\n return -x\n}";
        let total = source.chars().count();
        let (ast, handler) = parse_source(source);
        assert!(!handler.has_errors());

        fn check_stmt(stmt: &Stmt, total: usize) {
            assert!(stmt.begin <= stmt.end, "backwards span");
            assert!(stmt.end <= total, "span out of bounds");
        }
        for stmt in &ast {
            check_stmt(stmt, total);
        }
    }

    #[test]
    fn test_statement_spans_are_token_tight() {
        let source = "  x = 1  ";
        let handler = Handler::new();
        let buffer = SourceBuffer::new("edge.qll", source);
        let tokens = lex(&buffer, &handler);
        let ast = parse(&tokens, &handler);
        // First token begin and last token end bound the statement.
        assert_eq!(ast[0].begin, 2);
        assert_eq!(ast[0].end, 7);
    }

    // ==================== DISAMBIGUATION ====================

    #[test]
    fn test_scope_of_call_result() {
        let (ast, handler) = parse_source("f().field");
        assert!(!handler.has_errors());
        let StmtKind::Expression(expr) = &ast[0].kind else {
            panic!("expected expression");
        };
        let ExprKind::Scope(scope) = &expr.kind else {
            panic!("expected scope");
        };
        assert!(matches!(scope.value.kind, ExprKind::Call(_)));
    }

    #[test]
    fn test_index_of_scope() {
        let (ast, handler) = parse_source("a.b[0]");
        assert!(!handler.has_errors());
        let StmtKind::Expression(expr) = &ast[0].kind else {
            panic!("expected expression");
        };
        assert!(matches!(expr.kind, ExprKind::Index(_)));
    }

    #[test]
    fn test_templatize_inside_scope_chain() {
        let (ast, handler) = parse_source("std.List!(int)");
        assert!(!handler.has_errors());
        let StmtKind::Expression(expr) = &ast[0].kind else {
            panic!("expected expression");
        };
        let ExprKind::Templatize(templatize) = &expr.kind else {
            panic!("expected templatize");
        };
        assert!(matches!(templatize.value.kind, ExprKind::Scope(_)));
    }

    #[test]
    fn test_range_within_index() {
        let (ast, handler) = parse_source("xs[1 .. 5]");
        assert!(!handler.has_errors());
        let StmtKind::Expression(expr) = &ast[0].kind else {
            panic!("expected expression");
        };
        let ExprKind::Index(index) = &expr.kind else {
            panic!("expected index");
        };
        assert!(matches!(
            index.arguments[0].kind,
            ExprKind::Binary(Binary {
                op: BinaryOp::Range,
                ..
            })
        ));
    }

    #[test]
    fn test_comparison_against_bitwise() {
        // `a & b == c` keeps & tighter: comparison of (a & b) and c.
        let (ast, handler) = parse_source("a & b == c");
        assert!(!handler.has_errors());
        let StmtKind::Expression(expr) = &ast[0].kind else {
            panic!("expected expression");
        };
        let ExprKind::Comparison(comparison) = &expr.kind else {
            panic!("expected comparison");
        };
        assert!(matches!(
            comparison.operands[0].kind,
            ExprKind::Binary(Binary {
                op: BinaryOp::BitAnd,
                ..
            })
        ));
    }

    #[test]
    fn test_lambda_as_call_argument() {
        let (ast, handler) = parse_source("map(xs, def(x) { return x + 1 })");
        assert!(!handler.has_errors());
        let StmtKind::Expression(expr) = &ast[0].kind else {
            panic!("expected expression");
        };
        let ExprKind::Call(call) = &expr.kind else {
            panic!("expected call");
        };
        assert!(matches!(call.arguments[1].kind, ExprKind::Lambda(_)));
    }

    #[test]
    fn test_ternary_in_return() {
        let (ast, handler) = parse_source("def f(x: int) { return x if x > 0 else -x }");
        assert!(!handler.has_errors());
        let StmtKind::Function(function) = &ast[0].kind else {
            panic!("expected function");
        };
        let StmtKind::Return(ret) = &function.block[0].kind else {
            panic!("expected return");
        };
        assert!(matches!(ret.values[0].kind, ExprKind::Ternary(_)));
    }

    #[test]
    fn test_multiline_class_body() {
        let source = "class Vec3 {\n\n x: float\n\n y: float\n\n z: float\n\n}";
        let (ast, handler) = parse_source(source);
        assert!(!handler.has_errors());
        let StmtKind::Class(class) = &ast[0].kind else {
            panic!("expected class");
        };
        assert_eq!(class.block.len(), 3);
    }

    // ==================== STRUCTURAL INVARIANTS ====================

    #[test]
    fn test_if_branch_parallel_arrays() {
        let (ast, handler) =
            parse_source("if a { } elif b { } elif c { } else { done() }");
        assert!(!handler.has_errors());
        let StmtKind::IfBranch(branch) = &ast[0].kind else {
            panic!("expected if branch");
        };
        assert_eq!(branch.branch_conditions.len(), branch.branch_blocks.len());
        assert_eq!(branch.branch_conditions.len(), 3);
    }

    #[test]
    fn test_comparison_operand_count() {
        let (ast, handler) = parse_source("a == b != c < d > e <= f >= g");
        assert!(!handler.has_errors());
        let StmtKind::Expression(expr) = &ast[0].kind else {
            panic!("expected expression");
        };
        let ExprKind::Comparison(comparison) = &expr.kind else {
            panic!("expected comparison");
        };
        assert_eq!(comparison.operations.len() + 1, comparison.operands.len());
        assert_eq!(comparison.operands.len(), 7);
    }

    #[test]
    fn test_ast_deep_copy_round_trip() {
        let (ast, handler) = parse_source("def f(x: T) -> T { return f(x - 1) + 1 }");
        assert!(!handler.has_errors());
        let copy = ast.clone();
        assert_eq!(ast, copy);
    }
}
