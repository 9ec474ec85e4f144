use crate::filter::{expr::Expression, predicate::Predicate};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Result of compiling one `$filter` string.
///
/// A downstream query layer registers every entry of `annotations` as a
/// computed column before filtering, applies `predicate`, and drops every
/// name in `deferred` from the final projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub predicate: Option<Predicate>,

    /// Set instead of `predicate` when the filter is a bare value such as
    /// `length(Name)` or `concat(A, B)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Expression>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<String, Expression>,

    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub deferred: IndexSet<String>,
}

impl FilterSpec {
    pub fn with_predicate(predicate: Predicate) -> Self {
        Self {
            predicate: Some(predicate),
            ..Self::default()
        }
    }

    pub fn with_value(value: Expression) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.predicate.is_none() && self.value.is_none()
    }

    /// Annotations that survive into the output projection.
    pub fn visible_annotations(&self) -> impl Iterator<Item = (&String, &Expression)> {
        self.annotations
            .iter()
            .filter(|(name, _)| !self.deferred.contains(*name))
    }

    /// Checks that every deferred name has a matching annotation.
    pub fn deferred_are_annotated(&self) -> bool {
        self.deferred
            .iter()
            .all(|name| self.annotations.contains_key(name))
    }
}
