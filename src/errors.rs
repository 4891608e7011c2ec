use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

use crate::ledger::DateWindowError;

/// Error type that captures forecasting, validation, and storage failures.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ForecastError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ForecastError::AccountNotFound(_))
    }
}

impl From<DateWindowError> for ForecastError {
    fn from(err: DateWindowError) -> Self {
        ForecastError::InvalidInput(err.to_string())
    }
}

pub type Result<T> = StdResult<T, ForecastError>;
