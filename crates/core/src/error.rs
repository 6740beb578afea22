//! Core error types

use thiserror::Error;

/// Core error type for the exchange simulation
#[derive(Debug, Error)]
pub enum CoreError {
    /// Clock speed multiplier must be a positive, finite number
    #[error("Invalid speed multiplier: {0}")]
    InvalidMultiplier(f64),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
