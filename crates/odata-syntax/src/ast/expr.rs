use crate::ast::span::Span;
use model::{
    core::literal::Literal,
    filter::{ArithOp, RelOp},
};

/// `<not-or-common> [and|or <bool_expr>]`
#[derive(Debug, Clone, PartialEq)]
pub struct BoolExpr {
    pub head: BoolHead,
    pub tail: Option<BoolTail>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoolHead {
    /// `not` followed by an optional operand. A missing operand is kept so
    /// the compiler can report it.
    Not(Option<Box<BoolExpr>>),
    Common(CommonExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolTail {
    pub connective: Connective,
    pub rest: Box<BoolExpr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommonExpr {
    Paren(Box<BoolExpr>),
    Marker(MarkerExpr),
    Function(FunctionExpr),
    Relation(RelExpr),
}

/// A function or arithmetic result compared against a literal.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerExpr {
    pub subject: MarkerSubject,
    pub op: RelOp,
    pub value: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerSubject {
    Function(FunctionExpr),
    Math(MathExpr),
}

/// `<field> <add|sub|mul|div|mod> <number>`
#[derive(Debug, Clone, PartialEq)]
pub struct MathExpr {
    pub field: Vec<String>,
    pub op: ArithOp,
    pub operand: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub name: String,
    pub args: Vec<Operand>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Function(FunctionExpr),
    Literal(Literal),
    /// `/`-separated navigation path, split into segments.
    Path(Vec<String>),
}

impl Operand {
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Function(_) => "function call",
            Operand::Literal(_) => "literal",
            Operand::Path(_) => "field path",
        }
    }
}

/// `<field-or-function> <relop> <operand>`
#[derive(Debug, Clone, PartialEq)]
pub struct RelExpr {
    pub left: Operand,
    pub op: RelOp,
    pub right: Operand,
    pub span: Span,
}
