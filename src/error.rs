//! Application error types

use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error came from talking to the screener backend.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::Status { .. } | AppError::Serialization(_)
        )
    }
}

/// Serializable error response for front ends
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        let (code, message) = match &err {
            AppError::Http(_) => ("HTTP_ERROR", err.to_string()),
            AppError::Status { .. } => ("HTTP_STATUS_ERROR", err.to_string()),
            AppError::Serialization(_) => ("SERIALIZATION_ERROR", err.to_string()),
            AppError::Csv(_) => ("CSV_ERROR", err.to_string()),
            AppError::Validation(_) => ("VALIDATION_ERROR", err.to_string()),
            AppError::NotFound(_) => ("NOT_FOUND", err.to_string()),
            AppError::Config(_) => ("CONFIG_ERROR", err.to_string()),
            AppError::Io(_) => ("IO_ERROR", err.to_string()),
            AppError::Internal(_) => ("INTERNAL_ERROR", err.to_string()),
        };

        ErrorResponse {
            code: code.to_string(),
            message,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
