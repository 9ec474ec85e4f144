use model::error::FilterError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Invalid $filter: {0}")]
    Filter(#[from] FilterError),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidOption {
        key: String,
        value: String,
        reason: String,
    },
}

impl PlanError {
    pub fn invalid_option(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PlanError::InvalidOption {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;
