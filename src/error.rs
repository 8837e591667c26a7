//! Error types for defender-savings
//!
//! There are two error types: `SavingsError` (main error enum) and
//! `ConfigError` (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `SavingsError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling, and the
//! conversion happens at the CLI boundary so exit codes can still be derived
//! from the structured error.
//!
//! The cost core (counter, calculator, report) never returns errors. Every
//! variant here originates in configuration loading or in the inventory API
//! layer.
//!
//! ## Retry Awareness
//!
//! Errors implement `IsRetryable`. The `RetryPolicy` in `src/retry.rs` uses
//! it to decide whether a failed page request is attempted again. Transport
//! failures, throttling (429), server errors (5xx) and I/O are retryable.
//! Client errors such as a rejected token fail immediately.

use thiserror::Error;

/// Main error type for defender-savings
#[derive(Error, Debug)]
pub enum SavingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Inventory API error: HTTP {status} - {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Retryable error (attempt {attempt}/{max_attempts}): {reason}")]
    Retryable {
        attempt: u32,
        max_attempts: u32,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOKEN environment variable is required (or set it in .env)")]
    MissingToken,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid pricing entry for {module}: {reason}")]
    InvalidPricing { module: String, reason: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SavingsError>;

/// Trait for determining if an error is retryable
///
/// Used by `RetryPolicy` implementations to determine whether an error
/// should trigger a retry attempt.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for SavingsError {
    fn is_retryable(&self) -> bool {
        match self {
            SavingsError::Api { status, .. } => *status == 429 || *status >= 500,
            SavingsError::Http(e) => !e.is_decode() && !e.is_builder(),
            SavingsError::Io(_) | SavingsError::Retryable { .. } => true,
            _ => false,
        }
    }
}
