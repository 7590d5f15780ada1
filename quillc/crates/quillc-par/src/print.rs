//! AST dumping.
//!
//! Renders the tree as indented text for `--ast` output and debugging.
//! The data types stay printing-free; everything lives here.

use std::fmt::Write;

use crate::ast::*;

/// Renders a whole program.
pub fn dump_ast(ast: &[Stmt]) -> String {
    let mut out = String::new();
    for stmt in ast {
        write_stmt(&mut out, stmt, 0);
    }
    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

fn linef(out: &mut String, depth: usize, args: std::fmt::Arguments<'_>) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.write_fmt(args).expect("writing to a String cannot fail");
    out.push('\n');
}

fn write_block(out: &mut String, label: &str, block: &[Stmt], depth: usize) {
    if block.is_empty() {
        linef(out, depth, format_args!("{label}: (empty)"));
        return;
    }
    linef(out, depth, format_args!("{label}:"));
    for stmt in block {
        write_stmt(out, stmt, depth + 1);
    }
}

fn write_variable(out: &mut String, variable: &Variable, depth: usize) {
    line(out, depth, "variable:");
    linef(out, depth + 1, format_args!("name: {}", variable.name));
    let mut flags = Vec::new();
    if variable.is_static {
        flags.push("static");
    }
    if variable.is_wild {
        flags.push("wild");
    }
    if variable.is_ref {
        flags.push("ref");
    }
    if !flags.is_empty() {
        linef(out, depth + 1, format_args!("flags: {}", flags.join(" ")));
    }
    if let Some(ty) = &variable.ty {
        line(out, depth + 1, "type:");
        write_expr(out, ty, depth + 2);
    }
    if let Some(initializer) = &variable.initializer {
        line(out, depth + 1, "initializer:");
        write_expr(out, initializer, depth + 2);
    }
}

fn write_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    match &stmt.kind {
        StmtKind::Invalid => line(out, depth, "invalid statement"),
        StmtKind::Variable(variable) => write_variable(out, variable, depth),
        StmtKind::Expression(expr) => {
            line(out, depth, "expression:");
            write_expr(out, expr, depth + 1);
        },
        StmtKind::Import(import) => {
            line(out, depth, "import:");
            linef(
                out,
                depth + 1,
                format_args!(
                    "path: {}{}",
                    if import.relative { "." } else { "" },
                    join_symbols(&import.path)
                ),
            );
            if let Some(alias) = import.alias {
                linef(out, depth + 1, format_args!("alias: {alias}"));
            }
        },
        StmtKind::Include(include) => {
            line(out, depth, "include:");
            linef(
                out,
                depth + 1,
                format_args!(
                    "path: {}{}",
                    if include.relative { "." } else { "" },
                    join_symbols(&include.path)
                ),
            );
        },
        StmtKind::Function(function) => {
            line(out, depth, "function:");
            linef(
                out,
                depth + 1,
                format_args!("name: {}", join_symbols(&function.identifiers)),
            );
            if function.is_incase {
                line(out, depth + 1, "incase");
            }
            if function.is_static {
                line(out, depth + 1, "static");
            }
            if !function.template_parameters.is_empty() {
                linef(
                    out,
                    depth + 1,
                    format_args!(
                        "template parameters: {}",
                        join_separated(&function.template_parameters, ", ")
                    ),
                );
            }
            for argument in &function.arguments {
                line(out, depth + 1, "argument:");
                write_variable(out, argument, depth + 2);
            }
            if let Some(variadic) = &function.variadic_argument {
                line(out, depth + 1, "variadic argument:");
                write_variable(out, variadic, depth + 2);
            }
            if let Some(return_type) = &function.return_type {
                if function.is_return_type_ref {
                    line(out, depth + 1, "return type (ref):");
                } else {
                    line(out, depth + 1, "return type:");
                }
                write_expr(out, return_type, depth + 2);
            }
            write_block(out, "block", &function.block, depth + 1);
        },
        StmtKind::Class(class) => {
            line(out, depth, "class:");
            linef(out, depth + 1, format_args!("name: {}", class.name));
            if class.is_incase {
                line(out, depth + 1, "incase");
            }
            if !class.template_parameters.is_empty() {
                linef(
                    out,
                    depth + 1,
                    format_args!(
                        "template parameters: {}",
                        join_separated(&class.template_parameters, ", ")
                    ),
                );
            }
            if let Some(base_type) = &class.base_type {
                line(out, depth + 1, "inherits:");
                write_expr(out, base_type, depth + 2);
            }
            write_block(out, "block", &class.block, depth + 1);
        },
        StmtKind::Struct(parsed) => {
            line(out, depth, "struct:");
            linef(out, depth + 1, format_args!("name: {}", parsed.name));
            if parsed.is_incase {
                line(out, depth + 1, "incase");
            }
            if !parsed.template_parameters.is_empty() {
                linef(
                    out,
                    depth + 1,
                    format_args!(
                        "template parameters: {}",
                        join_separated(&parsed.template_parameters, ", ")
                    ),
                );
            }
            write_block(out, "block", &parsed.block, depth + 1);
        },
        StmtKind::Enum(parsed) => {
            line(out, depth, "enum:");
            linef(out, depth + 1, format_args!("name: {}", parsed.name));
            linef(
                out,
                depth + 1,
                format_args!("members: {}", join_separated(&parsed.members, ", ")),
            );
        },
        StmtKind::Alias(alias) => {
            line(out, depth, "alias:");
            linef(out, depth + 1, format_args!("name: {}", alias.name));
            if alias.is_incase {
                line(out, depth + 1, "incase");
            }
            line(out, depth + 1, "expression:");
            write_expr(out, &alias.expression, depth + 2);
        },
        StmtKind::IfBranch(branch) => {
            line(out, depth, "if branch:");
            for (condition, block) in branch
                .branch_conditions
                .iter()
                .zip(&branch.branch_blocks)
            {
                line(out, depth + 1, "condition:");
                write_expr(out, condition, depth + 2);
                write_block(out, "block", block, depth + 1);
            }
            if !branch.else_block.is_empty() {
                write_block(out, "else block", &branch.else_block, depth + 1);
            }
        },
        StmtKind::WhileLoop(while_loop) => {
            line(out, depth, "while loop:");
            line(out, depth + 1, "condition:");
            write_expr(out, &while_loop.condition, depth + 2);
            write_block(out, "block", &while_loop.block, depth + 1);
        },
        StmtKind::DoWhileLoop(do_while) => {
            line(out, depth, "do-while loop:");
            line(out, depth + 1, "condition:");
            write_expr(out, &do_while.condition, depth + 2);
            write_block(out, "block", &do_while.block, depth + 1);
        },
        StmtKind::ForLoop(for_loop) => {
            line(out, depth, "for loop:");
            linef(
                out,
                depth + 1,
                format_args!("iterators: {}", join_separated(&for_loop.iterators, ", ")),
            );
            line(out, depth + 1, "iteratee:");
            write_expr(out, &for_loop.iteratee, depth + 2);
            write_block(out, "block", &for_loop.block, depth + 1);
        },
        StmtKind::Break => line(out, depth, "break"),
        StmtKind::Continue => line(out, depth, "continue"),
        StmtKind::Return(parsed) => {
            if parsed.values.is_empty() {
                line(out, depth, "return");
            } else {
                line(out, depth, "return:");
                for value in &parsed.values {
                    write_expr(out, value, depth + 1);
                }
            }
        },
    }
}

fn write_expr(out: &mut String, expr: &Expr, depth: usize) {
    match &expr.kind {
        ExprKind::Invalid => line(out, depth, "invalid expression"),
        ExprKind::Identifier(name) => linef(out, depth, format_args!("identifier `{name}`")),
        ExprKind::Char(value) => linef(out, depth, format_args!("char {value:?}")),
        ExprKind::String(value) => linef(out, depth, format_args!("string {value:?}")),
        ExprKind::Buffer(value) => linef(out, depth, format_args!("buffer {value:?}")),
        ExprKind::Byte(value) => linef(out, depth, format_args!("byte {value}")),
        ExprKind::Integer(value) => linef(out, depth, format_args!("integer {value}")),
        ExprKind::Uinteger(value) => linef(out, depth, format_args!("uinteger {value}")),
        ExprKind::Float(value) => linef(out, depth, format_args!("float {value}")),
        ExprKind::Double(value) => linef(out, depth, format_args!("double {value}")),
        ExprKind::IFloat(value) => linef(out, depth, format_args!("ifloat {value}i")),
        ExprKind::IDouble(value) => linef(out, depth, format_args!("idouble {value}i")),
        ExprKind::Ellipsis => line(out, depth, "ellipsis"),
        ExprKind::Tuple(values) => {
            line(out, depth, "tuple:");
            for value in values {
                write_expr(out, value, depth + 1);
            }
        },
        ExprKind::Array(values) => {
            line(out, depth, "array:");
            for value in values {
                write_expr(out, value, depth + 1);
            }
        },
        ExprKind::Dict(dict) => {
            line(out, depth, "dict:");
            for (key, value) in dict.keys.iter().zip(&dict.values) {
                line(out, depth + 1, "key:");
                write_expr(out, key, depth + 2);
                line(out, depth + 1, "value:");
                write_expr(out, value, depth + 2);
            }
        },
        ExprKind::Signature(signature) => {
            line(out, depth, "signature:");
            for (is_ref, ty) in signature
                .are_arguments_refs
                .iter()
                .zip(&signature.argument_types)
            {
                if *is_ref {
                    line(out, depth + 1, "argument type (ref):");
                } else {
                    line(out, depth + 1, "argument type:");
                }
                write_expr(out, ty, depth + 2);
            }
            if let Some(return_type) = &signature.return_type {
                if signature.is_return_type_ref {
                    line(out, depth + 1, "return type (ref):");
                } else {
                    line(out, depth + 1, "return type:");
                }
                write_expr(out, return_type, depth + 2);
            }
        },
        ExprKind::Lambda(lambda) => {
            line(out, depth, "lambda:");
            for argument in &lambda.arguments {
                line(out, depth + 1, "argument:");
                write_variable(out, argument, depth + 2);
            }
            if let Some(variadic) = &lambda.variadic_argument {
                line(out, depth + 1, "variadic argument:");
                write_variable(out, variadic, depth + 2);
            }
            if let Some(return_type) = &lambda.return_type {
                if lambda.is_return_type_ref {
                    line(out, depth + 1, "return type (ref):");
                } else {
                    line(out, depth + 1, "return type:");
                }
                write_expr(out, return_type, depth + 2);
            }
            write_block(out, "block", &lambda.block, depth + 1);
        },
        ExprKind::Unary(unary) => {
            let name = match unary.op {
                UnaryOp::Positive => "positive",
                UnaryOp::Negative => "negative",
                UnaryOp::Not => "not",
                UnaryOp::BitNot => "bit not",
            };
            linef(out, depth, format_args!("unary ({name}):"));
            write_expr(out, &unary.operand, depth + 1);
        },
        ExprKind::Binary(binary) => {
            linef(
                out,
                depth,
                format_args!("binary ({}):", binary_op_name(binary.op)),
            );
            write_expr(out, &binary.left, depth + 1);
            write_expr(out, &binary.right, depth + 1);
        },
        ExprKind::Ternary(ternary) => {
            line(out, depth, "ternary:");
            line(out, depth + 1, "condition:");
            write_expr(out, &ternary.condition, depth + 2);
            line(out, depth + 1, "value:");
            write_expr(out, &ternary.value, depth + 2);
            line(out, depth + 1, "otherwise:");
            write_expr(out, &ternary.otherwise, depth + 2);
        },
        ExprKind::Comparison(comparison) => {
            let ops: Vec<&str> = comparison
                .operations
                .iter()
                .map(|op| comparison_op_name(*op))
                .collect();
            linef(
                out,
                depth,
                format_args!("comparison ({}):", ops.join(", ")),
            );
            for operand in &comparison.operands {
                write_expr(out, operand, depth + 1);
            }
        },
        ExprKind::Call(call) => {
            line(out, depth, "call:");
            line(out, depth + 1, "callee:");
            write_expr(out, &call.callee, depth + 2);
            for argument in &call.arguments {
                line(out, depth + 1, "argument:");
                write_expr(out, argument, depth + 2);
            }
        },
        ExprKind::Index(index) => {
            line(out, depth, "index:");
            line(out, depth + 1, "indexee:");
            write_expr(out, &index.indexee, depth + 2);
            for argument in &index.arguments {
                line(out, depth + 1, "argument:");
                write_expr(out, argument, depth + 2);
            }
        },
        ExprKind::Scope(scope) => {
            linef(
                out,
                depth,
                format_args!("scope `.{}`:", join_symbols(&scope.names)),
            );
            write_expr(out, &scope.value, depth + 1);
        },
        ExprKind::Templatize(templatize) => {
            line(out, depth, "templatize:");
            line(out, depth + 1, "value:");
            write_expr(out, &templatize.value, depth + 2);
            for argument in &templatize.arguments {
                line(out, depth + 1, "argument:");
                write_expr(out, argument, depth + 2);
            }
        },
    }
}

fn binary_op_name(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Assign => "assign",
        BinaryOp::Range => "range",
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mul => "mul",
        BinaryOp::Div => "div",
        BinaryOp::Mod => "mod",
        BinaryOp::Dot => "dot",
        BinaryOp::Pow => "pow",
        BinaryOp::IpAdd => "add assign",
        BinaryOp::IpSub => "sub assign",
        BinaryOp::IpMul => "mul assign",
        BinaryOp::IpDiv => "div assign",
        BinaryOp::IpMod => "mod assign",
        BinaryOp::IpDot => "dot assign",
        BinaryOp::IpPow => "pow assign",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
        BinaryOp::Xor => "xor",
        BinaryOp::BitAnd => "bit and",
        BinaryOp::BitOr => "bit or",
        BinaryOp::BitXor => "bit xor",
        BinaryOp::BitLshift => "left shift",
        BinaryOp::BitRshift => "right shift",
        BinaryOp::IpBitAnd => "bit and assign",
        BinaryOp::IpBitOr => "bit or assign",
        BinaryOp::IpBitXor => "bit xor assign",
        BinaryOp::IpBitLshift => "left shift assign",
        BinaryOp::IpBitRshift => "right shift assign",
    }
}

fn comparison_op_name(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Equal => "equal",
        ComparisonOp::Unequal => "unequal",
        ComparisonOp::Less => "less",
        ComparisonOp::Greater => "greater",
        ComparisonOp::LessEqual => "less equal",
        ComparisonOp::GreaterEqual => "greater equal",
    }
}

fn join_symbols(symbols: &[quillc_util::Symbol]) -> String {
    symbols
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

fn join_separated(symbols: &[quillc_util::Symbol], separator: &str) -> String {
    symbols
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}
