//! Structural composition of compiled sub-expressions.

use indexmap::{IndexMap, IndexSet};
use model::{
    error::{FilterError, FilterResult},
    filter::{Expression, FilterSpec, Predicate},
};
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum Compiled {
    Predicate(Predicate),
    /// A bare non-boolean result such as `length(Name)`.
    Value(Expression),
}

/// One compiled sub-expression together with the annotations it introduced.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub compiled: Compiled,
    pub annotations: IndexMap<String, Expression>,
    pub deferred: IndexSet<String>,
}

impl Fragment {
    pub fn predicate(predicate: Predicate) -> Self {
        Self::new(Compiled::Predicate(predicate))
    }

    pub fn value(value: Expression) -> Self {
        Self::new(Compiled::Value(value))
    }

    fn new(compiled: Compiled) -> Self {
        Self {
            compiled,
            annotations: IndexMap::new(),
            deferred: IndexSet::new(),
        }
    }

    /// Registers a filter-only computed field.
    pub fn with_annotation(mut self, name: String, expr: Expression) -> Self {
        self.deferred.insert(name.clone());
        self.annotations.insert(name, expr);
        self
    }

    pub fn into_spec(self) -> FilterSpec {
        let (predicate, value) = match self.compiled {
            Compiled::Predicate(p) => (Some(p), None),
            Compiled::Value(v) => (None, Some(v)),
        };

        FilterSpec {
            predicate,
            value,
            annotations: self.annotations,
            deferred: self.deferred,
        }
    }

    fn split(self, connective: &str) -> FilterResult<(Predicate, SideTables)> {
        let tables = SideTables {
            annotations: self.annotations,
            deferred: self.deferred,
        };
        match self.compiled {
            Compiled::Predicate(p) => Ok((p, tables)),
            Compiled::Value(v) => Err(FilterError::structure(format!(
                "'{v}' is not a boolean expression and cannot be used with '{connective}'"
            ))),
        }
    }
}

struct SideTables {
    annotations: IndexMap<String, Expression>,
    deferred: IndexSet<String>,
}

impl SideTables {
    fn union(&mut self, other: SideTables) {
        for (name, expr) in other.annotations {
            if self.annotations.insert(name.clone(), expr).is_some() {
                warn!(annotation = %name, "Duplicate annotation name; keeping the right-hand expression");
            }
        }
        self.deferred.extend(other.deferred);
    }

    fn into_fragment(self, predicate: Predicate) -> Fragment {
        Fragment {
            compiled: Compiled::Predicate(predicate),
            annotations: self.annotations,
            deferred: self.deferred,
        }
    }
}

pub fn and(left: Fragment, right: Fragment) -> FilterResult<Fragment> {
    combine(left, right, "and", Predicate::and)
}

pub fn or(left: Fragment, right: Fragment) -> FilterResult<Fragment> {
    combine(left, right, "or", Predicate::or)
}

pub fn not(inner: Fragment) -> FilterResult<Fragment> {
    let (predicate, tables) = inner.split("not")?;
    Ok(tables.into_fragment(Predicate::negate(predicate)))
}

fn combine(
    left: Fragment,
    right: Fragment,
    connective: &str,
    join: fn(Predicate, Predicate) -> Predicate,
) -> FilterResult<Fragment> {
    let (left, mut tables) = left.split(connective)?;
    let (right, right_tables) = right.split(connective)?;
    tables.union(right_tables);
    Ok(tables.into_fragment(join(left, right)))
}
