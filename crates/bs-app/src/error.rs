//! Error types for the bs-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the library crates and
/// gives front ends a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Instant error: {0}")]
    Core(#[from] bs_core::CoreError),

    #[error("Parameter error: {0}")]
    Params(String),

    #[error("Context error: {0}")]
    Context(String),

    #[error("Context not found: {0}")]
    ContextNotFound(String),

    #[error("Context already exists: {0}")]
    ContextExists(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported file format: {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bs-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<bs_params::ParamsError> for AppError {
    fn from(err: bs_params::ParamsError) -> Self {
        AppError::Params(err.to_string())
    }
}

impl From<bs_context::ContextError> for AppError {
    fn from(err: bs_context::ContextError) -> Self {
        match err {
            bs_context::ContextError::NotFound { run_id } => AppError::ContextNotFound(run_id),
            other => AppError::Context(other.to_string()),
        }
    }
}
