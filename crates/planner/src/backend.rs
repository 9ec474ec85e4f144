//! Contract between a compiled [`FilterSpec`] and a query backend.

use indexmap::IndexMap;
use model::filter::{Expression, FilterSpec, Predicate, RelOp};

/// Computed columns keyed by annotation name, in registration order.
pub type Columns<C> = IndexMap<String, C>;

/// Name under which a bare filter value is exposed by [`apply`].
pub const VALUE_COLUMN: &str = "value";

/// A backend's native filter vocabulary. Implementations are stateless
/// adapters passed by reference to [`translate`] and [`apply`].
pub trait FilterBackend {
    /// Native predicate type.
    type Predicate;

    /// Native computed-column type.
    type Column;

    type Error;

    /// Registers `expr` as a computed column called `name`.
    fn annotation(&self, name: &str, expr: &Expression) -> Result<Self::Column, Self::Error>;

    /// Translates one comparison. Field paths naming a key of `columns`
    /// refer to that computed column.
    fn comparison(
        &self,
        left: &Expression,
        op: RelOp,
        right: &Expression,
        columns: &Columns<Self::Column>,
    ) -> Result<Self::Predicate, Self::Error>;

    fn not(&self, inner: Self::Predicate) -> Self::Predicate;

    fn and(&self, left: Self::Predicate, right: Self::Predicate) -> Self::Predicate;

    fn or(&self, left: Self::Predicate, right: Self::Predicate) -> Self::Predicate;
}

/// Everything a backend needs to run one filtered query.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<P, C> {
    pub predicate: Option<P>,
    pub value: Option<C>,
    pub columns: Columns<C>,
    /// Columns to drop from the final projection.
    pub hidden: Vec<String>,
}

/// Translates a predicate tree with no computed columns in scope.
pub fn translate<B: FilterBackend>(
    predicate: &Predicate,
    backend: &B,
) -> Result<B::Predicate, B::Error> {
    translate_with(predicate, backend, &Columns::new())
}

pub fn translate_with<B: FilterBackend>(
    predicate: &Predicate,
    backend: &B,
    columns: &Columns<B::Column>,
) -> Result<B::Predicate, B::Error> {
    match predicate {
        Predicate::Comparison { left, op, right } => backend.comparison(left, *op, right, columns),
        Predicate::Not(inner) => Ok(backend.not(translate_with(inner, backend, columns)?)),
        Predicate::And(l, r) => Ok(backend.and(
            translate_with(l, backend, columns)?,
            translate_with(r, backend, columns)?,
        )),
        Predicate::Or(l, r) => Ok(backend.or(
            translate_with(l, backend, columns)?,
            translate_with(r, backend, columns)?,
        )),
    }
}

/// Registers every annotation, then translates the predicate against them.
pub fn apply<B: FilterBackend>(
    spec: &FilterSpec,
    backend: &B,
) -> Result<Applied<B::Predicate, B::Column>, B::Error> {
    let mut columns = Columns::new();
    for (name, expr) in &spec.annotations {
        columns.insert(name.clone(), backend.annotation(name, expr)?);
    }

    let predicate = spec
        .predicate
        .as_ref()
        .map(|p| translate_with(p, backend, &columns))
        .transpose()?;
    let value = spec
        .value
        .as_ref()
        .map(|v| backend.annotation(VALUE_COLUMN, v))
        .transpose()?;

    Ok(Applied {
        predicate,
        value,
        columns,
        hidden: spec.deferred.iter().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;

    /// Renders predicates as strings.
    struct Echo;

    impl FilterBackend for Echo {
        type Predicate = String;
        type Column = String;
        type Error = String;

        fn annotation(&self, name: &str, expr: &Expression) -> Result<String, String> {
            Ok(format!("{expr} AS {name}"))
        }

        fn comparison(
            &self,
            left: &Expression,
            op: RelOp,
            right: &Expression,
            columns: &Columns<String>,
        ) -> Result<String, String> {
            if let Some(field) = left.as_field()
                && field.token("__").starts_with("annotated_value")
                && !columns.contains_key(&field.token("__"))
            {
                return Err(format!("unregistered column {left}"));
            }
            Ok(format!("{left} {op} {right}"))
        }

        fn not(&self, inner: String) -> String {
            format!("!({inner})")
        }

        fn and(&self, left: String, right: String) -> String {
            format!("({left} & {right})")
        }

        fn or(&self, left: String, right: String) -> String {
            format!("({left} | {right})")
        }
    }

    #[test]
    fn test_translate_walks_structure() {
        let spec = compile("C ne 'x' or not (A eq 1 and B eq 2)").unwrap();
        let translated = translate(spec.predicate.as_ref().unwrap(), &Echo).unwrap();
        assert_eq!(translated, "(C ne 'x' | !((A eq 1 & B eq 2)))");
    }

    #[test]
    fn test_apply_registers_annotations_first() {
        let spec = compile("Price add 2 gt 10").unwrap();
        let applied = apply(&spec, &Echo).unwrap();

        assert_eq!(applied.predicate.as_deref(), Some("annotated_value_1 gt 10"));
        assert_eq!(applied.columns["annotated_value_1"], "Price + 2 AS annotated_value_1");
        assert_eq!(applied.hidden, vec!["annotated_value_1"]);
        assert_eq!(applied.value, None);

        // without the columns the annotated name is unknown
        assert!(translate(spec.predicate.as_ref().unwrap(), &Echo).is_err());
    }

    #[test]
    fn test_apply_exposes_bare_value() {
        let spec = compile("length(Name)").unwrap();
        let applied = apply(&spec, &Echo).unwrap();
        assert_eq!(applied.predicate, None);
        assert_eq!(applied.value.as_deref(), Some("Name__length AS value"));
    }
}
