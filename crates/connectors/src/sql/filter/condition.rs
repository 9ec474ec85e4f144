use crate::sql::{
    filter::value::SqlExpr,
    renderer::{Render, Renderer},
};

/// Escape character used in `LIKE` patterns.
pub const LIKE_ESCAPE: char = '!';

/// A single filter condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        left: SqlExpr,
        comparator: &'static str,
        right: SqlExpr,
    },
    /// `pattern` is already escaped and carries its `%` wildcards.
    Like { expr: SqlExpr, pattern: String },
    IsNull(SqlExpr),
}

/// Escapes `LIKE` wildcards in user text.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

impl Render for Condition {
    fn render(&self, r: &mut Renderer) {
        match self {
            Condition::Compare {
                left,
                comparator,
                right,
            } => {
                left.render(r);
                r.sql.push_str(&format!(" {comparator} "));
                right.render(r);
            }
            Condition::Like { expr, pattern } => {
                expr.render(r);
                r.sql.push_str(" LIKE ");
                r.add_param(pattern.as_str().into());
                r.sql.push_str(&format!(" ESCAPE '{LIKE_ESCAPE}'"));
            }
            Condition::IsNull(expr) => {
                expr.render(r);
                r.sql.push_str(" IS NULL");
            }
        }
    }
}
