use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_ANNOTATION_PREFIX: &str = "annotated_value";

/// Tunables for `$filter` compilation. Missing keys in a settings file fall
/// back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Deepest nesting of parentheses, connectives and calls accepted.
    ///
    /// `and`/`or` continuations nest to the right, so every connective adds
    /// a level: a flat chain of `n` clauses needs a depth of `n - 1`, and at
    /// the default of 64 a chain of 66 clauses is rejected.
    pub max_depth: usize,

    /// Joins navigation segments and lookups into one field token
    pub navigation_separator: String,

    /// Synthetic annotation names are `<prefix>_<n>`
    pub annotation_prefix: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            navigation_separator: model::filter::expr::DEFAULT_SEPARATOR.to_string(),
            annotation_prefix: DEFAULT_ANNOTATION_PREFIX.to_string(),
        }
    }
}

impl FilterSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.navigation_separator = separator.into();
        self
    }

    pub fn with_annotation_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.annotation_prefix = prefix.into();
        self
    }
}
