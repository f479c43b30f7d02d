//! Configuration error types

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Moran neighbor count k must be at least 1")]
    InvalidNeighborCount,

    #[error("Moran p-value threshold must be in (0, 1], got {0}")]
    InvalidPThreshold(f64),

    #[error("Moran permutation count must be at least 1")]
    InvalidPermutations,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        let code = match &err {
            ConfigError::LoadError(_) => ErrorCode::InternalError,
            ConfigError::ValidationFailed(_) => ErrorCode::ValidationFailed,
        };
        DomainError::new(code, err.to_string())
    }
}
