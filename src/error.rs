//! Error types shared across the data access and service layers

use thiserror::Error;

use crate::create::ValidationErrors;

/// Failure talking to the backend (or the files standing in for it)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid {table} row {row}: {message}")]
    InvalidRow {
        table: &'static str,
        row: usize,
        message: String,
    },

    #[error("Insert rejected: {0}")]
    Rejected(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by the authentication collaborator
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication service error: {0}")]
    Service(String),
}

/// Failure loading the tracker configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: String },

    #[error("Config parsing failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Outcome of a failed user-facing operation
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("No authenticated user")]
    NotAuthenticated,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}
