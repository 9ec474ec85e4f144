use expr::SqlFilterExpr;
use value::SqlExpr;

pub mod condition;
pub mod expr;
pub mod value;

/// A computed column registered for filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlColumn {
    pub name: String,
    pub expr: SqlExpr,
}

/// SQL form of a compiled filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFilter {
    pub expr: Option<SqlFilterExpr>,
    pub columns: Vec<SqlColumn>,
    /// Bare filter value, when the filter is not boolean.
    pub value: Option<SqlExpr>,
    /// Computed columns to leave out of the final projection.
    pub hidden: Vec<String>,
}

impl SqlFilter {
    pub fn with_expr(expr: SqlFilterExpr) -> Self {
        SqlFilter {
            expr: Some(expr),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expr.is_none() && self.value.is_none()
    }
}
