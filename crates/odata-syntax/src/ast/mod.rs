pub mod expr;
pub mod span;

pub use expr::{
    BoolExpr, BoolHead, BoolTail, CommonExpr, Connective, FunctionExpr, MarkerExpr,
    MarkerSubject, MathExpr, Operand, RelExpr,
};
pub use span::Span;
