use crate::{
    error::SqlError,
    sql::{
        dialect::{Dialect, date_part_name},
        filter::{
            SqlColumn, SqlFilter,
            condition::{Condition, escape_like},
            expr::SqlFilterExpr,
            value::SqlExpr,
        },
        renderer::Renderer,
    },
};
use model::{
    core::literal::Literal,
    filter::{Expression, FieldPath, FilterSpec, Lookup, RelOp},
};
use planner::backend::{Columns, FilterBackend, apply};
use serde::Serialize;
use tracing::debug;

/// Translates compiled filters into SQL for one dialect.
pub struct SqlBackend<'a> {
    dialect: &'a dyn Dialect,
}

/// A filter rendered to text, ready to splice into a `SELECT`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedFilter {
    /// `<expr> AS <name>` for every computed column.
    pub columns: Vec<String>,
    pub where_clause: Option<String>,
    pub value: Option<String>,
    pub params: Vec<Literal>,
    pub hidden: Vec<String>,
}

impl<'a> SqlBackend<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    pub fn build(&self, spec: &FilterSpec) -> Result<SqlFilter, SqlError> {
        if let Some(missing) = spec
            .deferred
            .iter()
            .find(|name| !spec.annotations.contains_key(*name))
        {
            return Err(SqlError::UnknownColumn(missing.clone()));
        }

        let applied = apply(spec, self)?;
        Ok(SqlFilter {
            expr: applied.predicate,
            columns: applied
                .columns
                .into_iter()
                .map(|(name, expr)| SqlColumn { name, expr })
                .collect(),
            value: applied.value,
            hidden: applied.hidden,
        })
    }

    /// Builds and renders `spec`. Computed columns are rendered first, so
    /// their parameters come before those of the `WHERE` clause.
    pub fn render(&self, spec: &FilterSpec) -> Result<RenderedFilter, SqlError> {
        let filter = self.build(spec)?;
        let mut r = Renderer::new(self.dialect);

        let columns = filter
            .columns
            .iter()
            .map(|column| {
                let expr = r.render_detached(&column.expr);
                format!("{expr} AS {}", self.dialect.quote_identifier(&column.name))
            })
            .collect::<Vec<_>>();
        let value = filter.value.as_ref().map(|v| r.render_detached(v));
        let where_clause = filter.expr.as_ref().map(|e| r.render_detached(e));
        let (_, params) = r.finish();

        debug!(
            dialect = %self.dialect.name(),
            columns = columns.len(),
            params = params.len(),
            "Rendered SQL filter"
        );

        Ok(RenderedFilter {
            columns,
            where_clause,
            value,
            params,
            hidden: filter.hidden,
        })
    }

    fn value_expr(
        &self,
        expr: &Expression,
        columns: &Columns<SqlExpr>,
    ) -> Result<SqlExpr, SqlError> {
        match expr {
            Expression::Literal(Literal::Null) => Ok(SqlExpr::Null),
            Expression::Literal(lit) => Ok(SqlExpr::Param(lit.clone())),
            Expression::FieldPath(path) => field_expr(path, &path.lookups, columns),
            Expression::FunctionCall { name, args } if name.eq_ignore_ascii_case("concat") => {
                let args = args
                    .iter()
                    .map(|arg| self.value_expr(arg, columns))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SqlExpr::call("CONCAT", args))
            }
            Expression::FunctionCall { .. } => Err(SqlError::UnsupportedExpression(expr.to_string())),
            Expression::Arithmetic { op, left, right } => Ok(SqlExpr::Binary {
                left: Box::new(field_expr(left, &left.lookups, columns)?),
                op: op.symbol(),
                right: Box::new(SqlExpr::Param(right.clone())),
            }),
        }
    }
}

/// The column (or inlined computed column) behind `path`, with `lookups`
/// applied innermost-first.
fn field_expr(
    path: &FieldPath,
    lookups: &[Lookup],
    columns: &Columns<SqlExpr>,
) -> Result<SqlExpr, SqlError> {
    let base = match path.segments.as_slice() {
        [name] => columns.get(name).cloned(),
        _ => None,
    }
    .unwrap_or_else(|| SqlExpr::Column(path.segments.clone()));

    lookups.iter().try_fold(base, |expr, lookup| {
        let function = match lookup {
            Lookup::Lower => "LOWER",
            Lookup::Upper => "UPPER",
            Lookup::Trim => "TRIM",
            Lookup::Length => "CHAR_LENGTH",
            Lookup::Ceil => "CEIL",
            Lookup::Floor => "FLOOR",
            Lookup::Round => "ROUND",
            other => match date_part_name(*other) {
                Some(part) => {
                    return Ok(SqlExpr::DatePart {
                        part,
                        expr: Box::new(expr),
                    });
                }
                None => {
                    return Err(unsupported(
                        path,
                        *other,
                        "only valid as the last qualifier of a comparison",
                    ));
                }
            },
        };
        Ok(SqlExpr::call(function, vec![expr]))
    })
}

fn unsupported(path: &FieldPath, lookup: Lookup, reason: &str) -> SqlError {
    SqlError::UnsupportedLookup {
        field: path.to_string(),
        lookup: lookup.to_string(),
        reason: reason.to_string(),
    }
}

fn comparator(op: RelOp) -> &'static str {
    match op {
        RelOp::Eq => "=",
        RelOp::Ne => "<>",
        RelOp::Lt => "<",
        RelOp::Le => "<=",
        RelOp::Gt => ">",
        RelOp::Ge => ">=",
    }
}

/// Applies the positive/negative form of `leaf` for `eq`/`ne`.
fn polarity(
    leaf: Condition,
    op: RelOp,
    path: &FieldPath,
    lookup: Lookup,
) -> Result<SqlFilterExpr, SqlError> {
    match op {
        RelOp::Eq => Ok(SqlFilterExpr::leaf(leaf)),
        RelOp::Ne => Ok(SqlFilterExpr::negate(SqlFilterExpr::leaf(leaf))),
        _ => Err(unsupported(path, lookup, "only 'eq' and 'ne' apply")),
    }
}

/// `Name__contains eq 'x'`, `Name__isnull eq true` and friends.
fn boolean_lookup(
    subject: SqlExpr,
    path: &FieldPath,
    lookup: Lookup,
    op: RelOp,
    right: &Expression,
) -> Result<SqlFilterExpr, SqlError> {
    let pattern = match (lookup, right.as_literal()) {
        (Lookup::IsNull, Some(Literal::Boolean(expected))) => {
            let probe = polarity(Condition::IsNull(subject), op, path, lookup)?;
            return Ok(if *expected {
                probe
            } else {
                SqlFilterExpr::negate(probe)
            });
        }
        (Lookup::Contains, Some(Literal::String(needle))) => format!("%{}%", escape_like(needle)),
        (Lookup::StartsWith, Some(Literal::String(needle))) => format!("{}%", escape_like(needle)),
        (Lookup::EndsWith, Some(Literal::String(needle))) => format!("%{}", escape_like(needle)),
        _ => {
            return Err(unsupported(
                path,
                lookup,
                &format!("cannot compare with {right}"),
            ));
        }
    };

    polarity(
        Condition::Like {
            expr: subject,
            pattern,
        },
        op,
        path,
        lookup,
    )
}

impl FilterBackend for SqlBackend<'_> {
    type Predicate = SqlFilterExpr;
    type Column = SqlExpr;
    type Error = SqlError;

    fn annotation(&self, _name: &str, expr: &Expression) -> Result<SqlExpr, SqlError> {
        self.value_expr(expr, &Columns::new())
    }

    fn comparison(
        &self,
        left: &Expression,
        op: RelOp,
        right: &Expression,
        columns: &Columns<SqlExpr>,
    ) -> Result<SqlFilterExpr, SqlError> {
        if let Some(path) = left.as_field()
            && let Some((last, inner)) = path.lookups.split_last()
            && last.is_boolean()
        {
            let subject = field_expr(path, inner, columns)?;
            return boolean_lookup(subject, path, *last, op, right);
        }

        let left = self.value_expr(left, columns)?;
        if matches!(right, Expression::Literal(Literal::Null)) {
            let probe = SqlFilterExpr::leaf(Condition::IsNull(left));
            return match op {
                RelOp::Eq => Ok(probe),
                RelOp::Ne => Ok(SqlFilterExpr::negate(probe)),
                _ => Err(SqlError::UnsupportedExpression(format!(
                    "'{op}' comparison with null"
                ))),
            };
        }

        Ok(SqlFilterExpr::leaf(Condition::Compare {
            left,
            comparator: comparator(op),
            right: self.value_expr(right, columns)?,
        }))
    }

    fn not(&self, inner: SqlFilterExpr) -> SqlFilterExpr {
        SqlFilterExpr::negate(inner)
    }

    fn and(&self, left: SqlFilterExpr, right: SqlFilterExpr) -> SqlFilterExpr {
        SqlFilterExpr::and(left, right)
    }

    fn or(&self, left: SqlFilterExpr, right: SqlFilterExpr) -> SqlFilterExpr {
        SqlFilterExpr::or(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::{MySql, Postgres};
    use planner::compile;

    fn render(dialect: &dyn Dialect, filter: &str) -> RenderedFilter {
        let spec = compile(filter).unwrap();
        SqlBackend::new(dialect).render(&spec).unwrap()
    }

    #[test]
    fn test_simple_comparison() {
        let out = render(&Postgres, "Address/City ne 'London'");
        assert_eq!(out.where_clause.as_deref(), Some(r#""Address"."City" <> $1"#));
        assert_eq!(out.params, vec![Literal::from("London")]);
        assert!(out.columns.is_empty());
    }

    #[test]
    fn test_null_probes() {
        let out = render(&Postgres, "Name eq null");
        assert_eq!(out.where_clause.as_deref(), Some(r#""Name" IS NULL"#));

        let out = render(&MySql, "Name ne null");
        assert_eq!(out.where_clause.as_deref(), Some("NOT (`Name` IS NULL)"));
        assert!(out.params.is_empty());
    }

    #[test]
    fn test_string_match_escapes_wildcards() {
        let out = render(&MySql, "contains(tolower(Name), '50%')");
        assert_eq!(
            out.where_clause.as_deref(),
            Some("LOWER(`Name`) LIKE ? ESCAPE '!'")
        );
        assert_eq!(out.params, vec![Literal::from("%50!%%")]);
    }

    #[test]
    fn test_date_parts_per_dialect() {
        let pg = render(&Postgres, "year(BirthDate) eq 1971");
        assert_eq!(
            pg.where_clause.as_deref(),
            Some(r#"EXTRACT(YEAR FROM "BirthDate") = $1"#)
        );

        let my = render(&MySql, "year(BirthDate) eq 1971");
        assert_eq!(my.where_clause.as_deref(), Some("YEAR(`BirthDate`) = ?"));
    }

    #[test]
    fn test_annotations_are_inlined_and_hidden() {
        let out = render(&Postgres, "Price add 2.45 eq 5.00");
        assert_eq!(
            out.columns,
            vec![r#"("Price" + $1) AS "annotated_value_1""#]
        );
        assert_eq!(
            out.where_clause.as_deref(),
            Some(r#"("Price" + $2) = $3"#)
        );
        assert_eq!(
            out.params,
            vec![Literal::Float(2.45), Literal::Float(2.45), Literal::Float(5.0)]
        );
        assert_eq!(out.hidden, vec!["annotated_value_1"]);
    }

    #[test]
    fn test_bare_value() {
        let out = render(&Postgres, "concat('B', concat(A, C))");
        assert_eq!(out.where_clause, None);
        assert_eq!(
            out.value.as_deref(),
            Some(r#"CONCAT($1, CONCAT("A", "C"))"#)
        );
    }

    #[test]
    fn test_missing_annotation_is_reported() {
        let mut spec = FilterSpec::default();
        spec.deferred.insert("ghost".into());
        let err = SqlBackend::new(&Postgres).build(&spec).unwrap_err();
        assert_eq!(err, SqlError::UnknownColumn("ghost".into()));
    }

    #[test]
    fn test_unsupported_lookup_position() {
        let spec = compile("length(Name) gt 3 and startswith(Name, 'A')").unwrap();
        assert!(SqlBackend::new(&Postgres).render(&spec).is_ok());

        let spec = FilterSpec::with_predicate(model::filter::Predicate::comparison(
            FieldPath::from_navigation("Name")
                .with_lookup(Lookup::Contains)
                .into(),
            RelOp::Gt,
            Expression::literal("x"),
        ));
        assert!(matches!(
            SqlBackend::new(&Postgres).render(&spec).unwrap_err(),
            SqlError::UnsupportedLookup { .. }
        ));
    }
}
