use connectors::error::SqlError;
use model::error::FilterError;
use planner::PlanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse the settings file {path}: {source}")]
    Settings {
        path: String,
        source: serde_json::Error,
    },

    #[error("{0}")]
    Filter(#[from] FilterError),

    #[error("{0}")]
    Plan(#[from] PlanError),

    #[error("Failed to render SQL: {0}")]
    Sql(#[from] SqlError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}
