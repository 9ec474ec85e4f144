pub mod expr;
pub mod predicate;
pub mod spec;

pub use expr::{ArithOp, Expression, FieldPath, Lookup};
pub use predicate::{Predicate, RelOp};
pub use spec::FilterSpec;
