use crate::sql::renderer::{Render, Renderer};
use model::core::literal::Literal;

/// A value-producing SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpr {
    /// Dot-joined column reference, e.g. `"Address"."City"`
    Column(Vec<String>),
    Param(Literal),
    Null,
    Call {
        name: &'static str,
        args: Vec<SqlExpr>,
    },
    DatePart {
        part: &'static str,
        expr: Box<SqlExpr>,
    },
    Binary {
        left: Box<SqlExpr>,
        op: &'static str,
        right: Box<SqlExpr>,
    },
}

impl SqlExpr {
    pub fn call(name: &'static str, args: Vec<SqlExpr>) -> Self {
        SqlExpr::Call { name, args }
    }
}

impl Render for SqlExpr {
    fn render(&self, r: &mut Renderer) {
        match self {
            SqlExpr::Column(segments) => {
                let quoted = segments
                    .iter()
                    .map(|s| r.dialect.quote_identifier(s))
                    .collect::<Vec<_>>();
                r.sql.push_str(&quoted.join("."));
            }
            SqlExpr::Param(value) => r.add_param(value.clone()),
            SqlExpr::Null => r.sql.push_str("NULL"),
            SqlExpr::Call { name, args } => {
                r.sql.push_str(name);
                r.sql.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        r.sql.push_str(", ");
                    }
                    arg.render(r);
                }
                r.sql.push(')');
            }
            SqlExpr::DatePart { part, expr } => {
                let inner = r.render_detached(expr.as_ref());
                let extracted = r.dialect.date_part(part, &inner);
                r.sql.push_str(&extracted);
            }
            SqlExpr::Binary { left, op, right } => {
                r.sql.push('(');
                left.render(r);
                r.sql.push_str(&format!(" {op} "));
                right.render(r);
                r.sql.push(')');
            }
        }
    }
}
