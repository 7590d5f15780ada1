//! AST node definitions.
//!
//! Two tagged layers: statements and expressions. The begin/end scalar
//! offsets live in the outer struct, the variant payload in the kind
//! enum. Children are owned uniquely (`Box`/`Vec`), optional children
//! are `Option`, and the tree is acyclic with no back-pointers. `Clone`
//! is a deep structural copy and `PartialEq` a structural compare.

use quillc_util::{Span, Symbol};

/// The AST of one source file: its top-level statements.
pub type Ast = Vec<Stmt>;

/// A statement with its source range.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    /// First scalar offset of the statement.
    pub begin: usize,
    /// One past the last scalar offset of the statement.
    pub end: usize,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(kind: StmtKind, begin: usize, end: usize) -> Self {
        Self { begin, end, kind }
    }

    /// Placeholder for a statement that failed to parse.
    pub fn invalid(span: Span) -> Self {
        Self::new(StmtKind::Invalid, span.begin, span.end)
    }

    pub fn span(&self) -> Span {
        Span::new(self.begin, self.end)
    }
}

/// Statement payload.
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// A statement that failed to parse; a diagnostic accompanies it.
    Invalid,

    /// Variable declaration, also used for function/lambda arguments.
    Variable(Variable),

    /// Bare expression in statement position.
    Expression(Expr),

    Import(Import),
    Include(Include),
    Function(Function),
    Class(Class),
    Struct(Struct),
    Enum(Enum),
    Alias(Alias),

    IfBranch(IfBranch),
    WhileLoop(WhileLoop),
    DoWhileLoop(DoWhileLoop),
    ForLoop(ForLoop),
    Break,
    Continue,
    Return(Return),
}

/// Variable declaration.
///
/// `is_wild` means the type is inferred; `is_ref` means the binding is
/// by reference. A declared type is an expression subtree.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub is_static: bool,
    pub is_wild: bool,
    pub is_ref: bool,
    pub name: Symbol,
    pub ty: Option<Box<Expr>>,
    pub initializer: Option<Box<Expr>>,
}

/// `import a.b.c [as alias]`. A leading dot marks a relative path.
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    pub path: Vec<Symbol>,
    pub relative: bool,
    pub alias: Option<Symbol>,
}

/// `include a.b.c`.
#[derive(Clone, Debug, PartialEq)]
pub struct Include {
    pub path: Vec<Symbol>,
    pub relative: bool,
}

/// `def a.b!(T)(args) -> ref type { block }`.
///
/// `identifiers` is the dotted definition path; a plain function has
/// one element. The trailing `name...` argument, if any, is the
/// variadic argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub is_incase: bool,
    pub is_static: bool,
    pub identifiers: Vec<Symbol>,
    pub template_parameters: Vec<Symbol>,
    pub arguments: Vec<Variable>,
    pub variadic_argument: Option<Box<Variable>>,
    pub is_return_type_ref: bool,
    pub return_type: Option<Box<Expr>>,
    pub block: Vec<Stmt>,
}

/// `class Name!(T) inherits Base { block }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Class {
    pub is_incase: bool,
    pub name: Symbol,
    pub template_parameters: Vec<Symbol>,
    pub base_type: Option<Box<Expr>>,
    pub block: Vec<Stmt>,
}

/// `struct Name!(T) { block }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Struct {
    pub is_incase: bool,
    pub name: Symbol,
    pub template_parameters: Vec<Symbol>,
    pub block: Vec<Stmt>,
}

/// `enum Name { a, b, c }`. Member values are implicitly 0..n-1.
#[derive(Clone, Debug, PartialEq)]
pub struct Enum {
    pub name: Symbol,
    pub members: Vec<Symbol>,
}

/// `alias name = expression`.
#[derive(Clone, Debug, PartialEq)]
pub struct Alias {
    pub is_incase: bool,
    pub name: Symbol,
    pub expression: Box<Expr>,
}

/// `if c { } elif c { } else { }` flattened into parallel arrays.
///
/// Invariant: `branch_conditions.len() == branch_blocks.len()`. An
/// absent else is an empty `else_block`.
#[derive(Clone, Debug, PartialEq)]
pub struct IfBranch {
    pub branch_conditions: Vec<Expr>,
    pub branch_blocks: Vec<Vec<Stmt>>,
    pub else_block: Vec<Stmt>,
}

/// `while c { block }`.
#[derive(Clone, Debug, PartialEq)]
pub struct WhileLoop {
    pub condition: Box<Expr>,
    pub block: Vec<Stmt>,
}

/// `do { block } while c`.
#[derive(Clone, Debug, PartialEq)]
pub struct DoWhileLoop {
    pub condition: Box<Expr>,
    pub block: Vec<Stmt>,
}

/// `for a, b in e { block }` (iterator-style for-in).
#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
    pub iterators: Vec<Symbol>,
    pub iteratee: Box<Expr>,
    pub block: Vec<Stmt>,
}

/// `return a, b` - multiple return values are allowed; a bare `return`
/// has no values.
#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub values: Vec<Expr>,
}

/// An expression with its source range.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    /// First scalar offset of the expression.
    pub begin: usize,
    /// One past the last scalar offset of the expression.
    pub end: usize,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(kind: ExprKind, begin: usize, end: usize) -> Self {
        Self { begin, end, kind }
    }

    /// Placeholder for an expression that failed to parse.
    pub fn invalid(span: Span) -> Self {
        Self::new(ExprKind::Invalid, span.begin, span.end)
    }

    pub fn span(&self) -> Span {
        Span::new(self.begin, self.end)
    }
}

/// Expression payload.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// An expression that failed to parse; a diagnostic accompanies it.
    Invalid,

    Identifier(Symbol),
    Char(char),
    String(String),
    Buffer(Vec<u8>),
    Byte(u8),
    Integer(i128),
    Uinteger(u128),
    Float(f32),
    Double(f64),
    IFloat(f32),
    IDouble(f64),

    Tuple(Vec<Expr>),
    Array(Vec<Expr>),
    Dict(Dict),
    /// `...` - placeholder expression.
    Ellipsis,

    Signature(Signature),
    Lambda(Lambda),

    Unary(Unary),
    Binary(Binary),
    Ternary(Ternary),
    Comparison(Comparison),
    Call(Call),
    Index(Index),

    Scope(Scope),
    Templatize(Templatize),
}

/// `{k: v, ...}`. Invariant: `keys.len() == values.len()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Dict {
    pub keys: Vec<Expr>,
    pub values: Vec<Expr>,
}

/// The type of a function: `def(ref A, B) -> ref C`.
///
/// Invariant: `are_arguments_refs.len() == argument_types.len()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub are_arguments_refs: Vec<bool>,
    pub argument_types: Vec<Expr>,
    pub is_return_type_ref: bool,
    pub return_type: Option<Box<Expr>>,
}

/// A function value: `def(x: T, rest...) -> ref T { block }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Lambda {
    pub arguments: Vec<Variable>,
    pub variadic_argument: Option<Box<Variable>>,
    pub is_return_type_ref: bool,
    pub return_type: Option<Box<Expr>>,
    pub block: Vec<Stmt>,
}

/// Prefix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+x`
    Positive,
    /// `-x`
    Negative,
    /// `not x`
    Not,
    /// `~x`
    BitNot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Unary {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

/// Binary operators. `Dot` is the element-wise multiply; binary `~`
/// arrives here as `BitXor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Assign,
    Range,

    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Dot,
    Pow,

    IpAdd,
    IpSub,
    IpMul,
    IpDiv,
    IpMod,
    IpDot,
    IpPow,

    And,
    Or,
    Xor,

    BitAnd,
    BitOr,
    BitXor,
    BitLshift,
    BitRshift,

    IpBitAnd,
    IpBitOr,
    IpBitXor,
    IpBitLshift,
    IpBitRshift,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Binary {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// `value if condition else otherwise`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ternary {
    pub condition: Box<Expr>,
    pub value: Box<Expr>,
    pub otherwise: Box<Expr>,
}

/// Chain comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    Unequal,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

/// A comparison chain: `a < b <= c` is one node with operations
/// `[<, <=]` over operands `[a, b, c]`.
///
/// Invariant: `operations.len() + 1 == operands.len()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub operations: Vec<ComparisonOp>,
    pub operands: Vec<Expr>,
}

/// `callee(arguments)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

/// `indexee[arguments]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Index {
    pub indexee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

/// Member access chain: `value.name.name`.
#[derive(Clone, Debug, PartialEq)]
pub struct Scope {
    pub value: Box<Expr>,
    pub names: Vec<Symbol>,
}

/// Generic instantiation: `value!(arguments)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Templatize {
    pub value: Box<Expr>,
    pub arguments: Vec<Expr>,
}
