//! Error types for the sv-app layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the lower crates
/// and gives the CLI one error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Grouping error: {0}")]
    Grouping(String),

    #[error("Selection state error: {0}")]
    State(String),

    #[error("Failed to read {what} file: {path}")]
    FileRead {
        what: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for sv-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<sv_core::SvError> for AppError {
    fn from(err: sv_core::SvError) -> Self {
        AppError::Grouping(err.to_string())
    }
}

impl From<sv_state::StateError> for AppError {
    fn from(err: sv_state::StateError) -> Self {
        AppError::State(err.to_string())
    }
}
