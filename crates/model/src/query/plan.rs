use crate::{filter::spec::FilterSpec, query::range::RowRange};
use serde::{Deserialize, Serialize};

/// Everything a query layer needs from one OData request's system query
/// options. Ordering, projection and range are independent of the filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub filter: Option<FilterSpec>,

    /// Field tokens in priority order; descending entries carry a `-` prefix.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expand: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RowRange>,
}

impl QueryPlan {
    /// Output projection with filter-only annotations removed. Returns `None`
    /// when no `$select` was given, meaning "all fields".
    pub fn projection(&self) -> Option<Vec<&str>> {
        if self.select.is_empty() {
            return None;
        }

        let deferred = self.filter.as_ref().map(|f| &f.deferred);
        Some(
            self.select
                .iter()
                .filter(|name| deferred.is_none_or(|d| !d.contains(*name)))
                .map(String::as_str)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_drops_deferred_names() {
        let mut filter = FilterSpec::default();
        filter.deferred.insert("annotated_value_1".to_string());

        let plan = QueryPlan {
            filter: Some(filter),
            select: vec!["Name".into(), "annotated_value_1".into()],
            ..QueryPlan::default()
        };

        assert_eq!(plan.projection(), Some(vec!["Name"]));
        assert_eq!(QueryPlan::default().projection(), None);
    }
}
