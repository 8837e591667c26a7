//! Exit code standardization for defender-savings
//!
//! ## Exit Code Convention
//!
//! - `0` = Success
//! - `1` = User error (invalid input, validation failure)
//! - `2` = System error (inventory API failure, network error, I/O)
//! - `3` = Configuration error (missing token, config parse error, bad pricing)

use crate::error::SavingsError;

/// Standard exit codes
pub mod codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// User error (invalid input, validation failure)
    pub const USER_ERROR: i32 = 1;
    /// System error (API failure, network error)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration error (missing token, invalid config)
    pub const CONFIG_ERROR: i32 = 3;
}

/// Map a `SavingsError` to an exit code
pub fn exit_code_for_error(error: &SavingsError) -> i32 {
    use SavingsError::*;
    match error {
        Config(_) => codes::CONFIG_ERROR,

        Validation { .. } => codes::USER_ERROR,

        Api { .. } | Http(_) | Io(_) | Retryable { .. } | Json(_) => codes::SYSTEM_ERROR,
    }
}

/// Exit code for an error that reached the CLI boundary
///
/// Errors that did not originate in the library (anyhow context only) are
/// treated as system errors.
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<SavingsError>()
        .map(exit_code_for_error)
        .unwrap_or(codes::SYSTEM_ERROR)
}
