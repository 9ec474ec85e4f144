//! OData system query options (`$filter`, `$orderby`, `$select`, `$expand`,
//! `$top`, `$skip`) mapped into a [`QueryPlan`].

use crate::{
    compiler::Compiler,
    error::{PlanError, PlanResult},
    settings::FilterSettings,
};
use model::query::{QueryPlan, RowRange};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct QueryPlanner {
    compiler: Compiler,
}

impl QueryPlanner {
    pub fn new(settings: FilterSettings) -> Self {
        Self {
            compiler: Compiler::new(settings),
        }
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Plans from a raw URL query string such as
    /// `$filter=Price%20lt%2020&$top=10`. A leading `?` is ignored.
    pub fn plan_query_string(&self, query: &str) -> PlanResult<QueryPlan> {
        let query = query.strip_prefix('?').unwrap_or(query);
        self.plan(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Plans from decoded key/value pairs. Keys without a `$` prefix are
    /// not system query options and are skipped.
    pub fn plan<I, K, V>(&self, pairs: I) -> PlanResult<QueryPlan>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let separator = self.compiler.settings().navigation_separator.as_str();
        let mut plan = QueryPlan::default();
        let mut top = None;
        let mut skip = None;

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "$filter" => plan.filter = Some(self.compiler.compile(value)?),
                "$orderby" => plan.order_by = order_by(value, separator)?,
                "$select" => plan.select = field_list(value, separator),
                "$expand" => plan.expand = field_list(value, separator),
                "$top" => top = Some(count(key, value)?),
                "$skip" => skip = Some(count(key, value)?),
                _ if key.starts_with('$') => debug!(option = key, "Ignoring unsupported query option"),
                _ => {}
            }
        }

        plan.range = RowRange::from_options(top, skip);
        Ok(plan)
    }
}

/// `"Name desc,LastName"` becomes `["-Name", "LastName"]`.
pub fn order_by(value: &str, separator: &str) -> PlanResult<Vec<String>> {
    terms(value)
        .map(|term| {
            let mut words = term.split_whitespace();
            let field = words.next().unwrap_or_default();
            let token = field_token(field, separator);

            match (words.next(), words.next()) {
                (None | Some("asc"), None) => Ok(token),
                (Some("desc"), None) => Ok(format!("-{token}")),
                _ => Err(PlanError::invalid_option(
                    "$orderby",
                    term,
                    "expected '<field> [asc|desc]'",
                )),
            }
        })
        .collect()
}

/// Comma-separated field paths for `$select` and `$expand`.
pub fn field_list(value: &str, separator: &str) -> Vec<String> {
    terms(value).map(|term| field_token(term, separator)).collect()
}

fn terms(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn field_token(path: &str, separator: &str) -> String {
    path.split('/').collect::<Vec<_>>().join(separator)
}

fn count(key: &str, value: &str) -> PlanResult<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|e| PlanError::invalid_option(key, value, e.to_string()))
}
