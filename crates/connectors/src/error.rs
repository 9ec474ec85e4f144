use thiserror::Error;

/// Errors raised while turning a filter into SQL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlError {
    /// A lookup that SQL cannot express in this position.
    #[error("Unsupported lookup '{lookup}' on {field}: {reason}")]
    UnsupportedLookup {
        field: String,
        lookup: String,
        reason: String,
    },

    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// A deferred name with no computed column behind it.
    #[error("Unknown computed column: {0}")]
    UnknownColumn(String),

    #[error("Unknown SQL dialect: {0}")]
    UnknownDialect(String),
}
