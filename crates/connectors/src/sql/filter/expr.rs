use crate::sql::{
    filter::condition::Condition,
    renderer::{Render, Renderer},
};

/// A full boolean expression for SQL filtering
#[derive(Debug, Clone, PartialEq)]
pub enum SqlFilterExpr {
    /// A single leaf condition
    Leaf(Condition),

    /// An AND of 2+ sub-expressions
    /// (e.g. `WHERE a = 1 AND b = 2`)
    And(Vec<SqlFilterExpr>),

    /// An OR of 2+ sub-expressions
    /// (e.g. `WHERE a = 1 OR b = 2`)
    Or(Vec<SqlFilterExpr>),

    Not(Box<SqlFilterExpr>),
}

impl SqlFilterExpr {
    pub fn leaf(cond: Condition) -> Self {
        SqlFilterExpr::Leaf(cond)
    }

    /// Conjunction that absorbs nested `And` children.
    pub fn and(left: SqlFilterExpr, right: SqlFilterExpr) -> Self {
        match (left, right) {
            (SqlFilterExpr::And(mut l), SqlFilterExpr::And(r)) => {
                l.extend(r);
                SqlFilterExpr::And(l)
            }
            (SqlFilterExpr::And(mut l), r) => {
                l.push(r);
                SqlFilterExpr::And(l)
            }
            (l, SqlFilterExpr::And(mut r)) => {
                r.insert(0, l);
                SqlFilterExpr::And(r)
            }
            (l, r) => SqlFilterExpr::And(vec![l, r]),
        }
    }

    /// Disjunction that absorbs nested `Or` children.
    pub fn or(left: SqlFilterExpr, right: SqlFilterExpr) -> Self {
        match (left, right) {
            (SqlFilterExpr::Or(mut l), SqlFilterExpr::Or(r)) => {
                l.extend(r);
                SqlFilterExpr::Or(l)
            }
            (SqlFilterExpr::Or(mut l), r) => {
                l.push(r);
                SqlFilterExpr::Or(l)
            }
            (l, SqlFilterExpr::Or(mut r)) => {
                r.insert(0, l);
                SqlFilterExpr::Or(r)
            }
            (l, r) => SqlFilterExpr::Or(vec![l, r]),
        }
    }

    pub fn negate(inner: SqlFilterExpr) -> Self {
        SqlFilterExpr::Not(Box::new(inner))
    }

    /// Number of leaf conditions.
    pub fn conditions(&self) -> usize {
        match self {
            SqlFilterExpr::Leaf(_) => 1,
            SqlFilterExpr::And(exprs) | SqlFilterExpr::Or(exprs) => {
                exprs.iter().map(SqlFilterExpr::conditions).sum()
            }
            SqlFilterExpr::Not(inner) => inner.conditions(),
        }
    }
}

impl Render for SqlFilterExpr {
    fn render(&self, r: &mut Renderer) {
        match self {
            SqlFilterExpr::Leaf(cond) => cond.render(r),
            SqlFilterExpr::And(exprs) => render_joined(exprs, " AND ", r),
            SqlFilterExpr::Or(exprs) => render_joined(exprs, " OR ", r),
            SqlFilterExpr::Not(inner) => match inner.as_ref() {
                SqlFilterExpr::And(_) | SqlFilterExpr::Or(_) => {
                    r.sql.push_str("NOT ");
                    inner.render(r);
                }
                _ => {
                    r.sql.push_str("NOT (");
                    inner.render(r);
                    r.sql.push(')');
                }
            },
        }
    }
}

fn render_joined(exprs: &[SqlFilterExpr], separator: &str, r: &mut Renderer) {
    r.sql.push('(');
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            r.sql.push_str(separator);
        }
        expr.render(r);
    }
    r.sql.push(')');
}
