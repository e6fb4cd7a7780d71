//! AST node definitions for the Sable language.
//!
//! Nodes form a strict tree: every child is owned by exactly one parent,
//! with the [`Program`] as root owner. Each node records the scope it was
//! parsed in (a weak reference; the scope tree is owned from the root
//! scope) and its source position.
//!
//! Expressions and statements are tagged variants sharing a common header
//! ([`Expr`] / [`Stmt`]) rather than an inheritance hierarchy; traversal is
//! a match over the variant tag, centralized in the visitor module.

use std::rc::Rc;

use sablec_sym::{ScopeRef, Type, WeakScope};
use sablec_util::Position;

/// Identity of an expression node within one compilation.
///
/// Assigned sequentially by the parser; the analyzer keys its inferred-type
/// annotation map on these and continues the sequence for the cast nodes it
/// inserts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExprId(pub u32);

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    /// Arithmetic negation, `-`.
    Neg,
    /// Logical not, `!`.
    Not,
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinOp {
    /// Operator precedence; lower numbers bind tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Mul | BinOp::Div | BinOp::Mod => 5,
            BinOp::Add | BinOp::Sub => 6,
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => 9,
            BinOp::Eq | BinOp::Ne => 10,
            BinOp::And => 14,
            BinOp::Or => 15,
        }
    }

    /// True for operators whose result is `bool` regardless of operand
    /// type: comparisons, equality, and the logical connectives.
    pub fn yields_bool(self) -> bool {
        self.precedence() > BinOp::Sub.precedence()
    }

    /// True for `&` and `|`, which also *require* `bool` operands.
    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "&",
            BinOp::Or => "|",
        }
    }
}

/// An expression node.
#[derive(Clone, Debug)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
    pub scope: WeakScope,
    pub pos: Position,
}

/// Expression variants.
#[derive(Clone, Debug)]
pub enum ExprKind {
    IntLit(i64),
    FloatLit(f32),
    DoubleLit(f64),
    BoolLit(bool),
    StringLit(String),

    /// A name use, resolved against the node's scope during analysis.
    Ident(String),

    /// A parenthesized expression.
    Paren(Box<Expr>),

    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },

    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// `start ... end`, or the degenerate `start` alone when iterating an
    /// array value.
    Range {
        start: Box<Expr>,
        end: Option<Box<Expr>>,
    },

    /// A parenthesized comma-separated value group; reifies to an
    /// argument-list type before struct-vs-array intent is known.
    ArgList(Vec<Expr>),

    /// `{ e1, e2, ... }`.
    ArrayLit(Vec<Expr>),

    /// `base.field`.
    Attribute {
        base: Box<Expr>,
        field: String,
    },

    /// `base[index]`.
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },

    /// `callee(args...)`.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    /// An implicit numeric conversion inserted by the analyzer. Never
    /// produced by the parser; downstream stages see conversions fully
    /// explicit in the tree.
    Cast {
        target: Rc<Type>,
        operand: Box<Expr>,
    },
}

impl Expr {
    /// True if this expression may appear on the left of an assignment.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Ident(_) | ExprKind::Attribute { .. } | ExprKind::Index { .. }
        )
    }
}

/// A braced sequence of statements with its own scope.
#[derive(Clone, Debug)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub scope: WeakScope,
    pub pos: Position,
}

/// A `Type name` pair: function parameter or struct attribute.
#[derive(Clone, Debug)]
pub struct Param {
    pub ty_name: String,
    pub name: String,
    pub pos: Position,
}

/// A function definition: free function or struct method.
#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub ret_ty_name: String,
    pub body: Block,
    /// The function's own scope (parameters live here; the body block's
    /// scope is its child).
    pub scope: WeakScope,
    pub pos: Position,
}

/// A struct definition.
#[derive(Clone, Debug)]
pub struct StructDef {
    pub name: String,
    pub attributes: Vec<Param>,
    pub methods: Vec<FunctionDef>,
    /// The member scope holding attributes and methods.
    pub scope: WeakScope,
    pub pos: Position,
}

/// A statement node.
#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub scope: WeakScope,
    pub pos: Position,
}

/// Statement variants.
#[derive(Clone, Debug)]
pub enum StmtKind {
    /// `Type name;`
    Declaration { ty_name: String, name: String },

    /// `Type name[N];`
    ArrayDeclaration {
        ty_name: String,
        name: String,
        size: usize,
    },

    /// `Type name = expr;`
    Initialization {
        ty_name: String,
        name: String,
        value: Expr,
    },

    /// `Type name[N] = (...) | {...};`
    ArrayInitialization {
        ty_name: String,
        name: String,
        size: usize,
        values: Expr,
    },

    /// `Struct name = (...);` where the leading identifier resolves to a
    /// struct type symbol.
    StructInitialization {
        ty_name: String,
        name: String,
        values: Expr,
    },

    /// `target = value;`
    Assignment { target: Expr, value: Expr },

    /// A bare expression followed by `;`.
    ExprStmt(Expr),

    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },

    /// `for iterator in range { body }`
    For {
        iterator: String,
        range: Expr,
        body: Block,
    },

    /// `return;` or `return expr;`
    Return(Option<Expr>),

    /// A free nested block.
    Block(Block),

    FunctionDef(FunctionDef),

    StructDef(StructDef),

    /// `import ns1::ns2::...::name;`
    Import {
        namespaces: Vec<String>,
        value: String,
    },

    /// `export name;` or `export { a, b, ... };`
    Export { names: Vec<String> },
}

/// The root of a parsed compilation unit.
#[derive(Debug)]
pub struct Program {
    /// The top-level scope; owning handle that keeps the scope tree alive.
    pub scope: ScopeRef,
    /// Top-level statements in source order.
    pub stmts: Vec<Stmt>,
    /// Number of expression ids handed out by the parser. The analyzer
    /// continues the sequence from here for inserted cast nodes.
    pub expr_count: u32,
}
