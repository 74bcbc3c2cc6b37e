//! Error types for failure handling across the client
//!
//! Remote failures are not represented here: a call that reaches the remote
//! and is rejected resolves through its failure continuation with the raw
//! status code. These variants cover everything that goes wrong before a
//! call is submitted or around the dispatcher itself.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ModwatchError {
    #[error("Usage error: {0}")]
    UsageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Dispatch error: {0}")]
    DispatchError(String),
    #[error("Lookup failed: {0}")]
    LookupError(String),
    #[error("API call failed with status {0}")]
    ApiError(u16),
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ModwatchError {
    fn from(err: std::io::Error) -> Self {
        ModwatchError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for ModwatchError {
    fn from(err: reqwest::Error) -> Self {
        ModwatchError::DispatchError(err.to_string())
    }
}
