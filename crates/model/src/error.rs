use thiserror::Error;

/// Failure kinds of `$filter` compilation. Each variant maps to a distinct
/// client-facing outcome, so callers match on the variant rather than the
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The text does not conform to the filter grammar.
    #[error("Syntax error at line {line}, column {column}: unexpected input '{fragment}' (expected {expected})")]
    Syntax {
        position: usize,
        line: usize,
        column: usize,
        fragment: String,
        expected: String,
    },

    /// The grammar matched but the expression has an invalid shape.
    #[error("Invalid expression structure: {0}")]
    Structure(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Invalid arguments for {function}: {message}")]
    Argument { function: String, message: String },

    #[error("Filter nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: usize },
}

impl FilterError {
    pub fn structure(message: impl Into<String>) -> Self {
        FilterError::Structure(message.into())
    }

    pub fn argument(function: impl Into<String>, message: impl Into<String>) -> Self {
        FilterError::Argument {
            function: function.into(),
            message: message.into(),
        }
    }

    /// True for errors caused by malformed input, as opposed to input that
    /// asks for something this compiler does not support.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, FilterError::UnknownFunction(_))
    }
}

pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FilterError::argument("length", "expected exactly one argument");
        assert_eq!(
            err.to_string(),
            "Invalid arguments for length: expected exactly one argument"
        );
        assert!(err.is_malformed());
        assert!(!FilterError::UnknownFunction("indexof".into()).is_malformed());
    }
}
