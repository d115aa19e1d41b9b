//! Common error types shared across crates.

use thiserror::Error;

/// Top-level error type for command-line callers.
///
/// Variants map to process exit codes:
/// - [`ToolError::BadInput`] → 2
/// - [`ToolError::AuthenticationFailure`] → 3
/// - [`ToolError::Io`] → 74
/// - [`ToolError::Internal`] → 1
#[derive(Debug, Error)]
pub enum ToolError {
    /// Malformed arguments, configuration, key material, or ciphertext framing.
    #[error("bad input: {0}")]
    BadInput(String),

    /// The ciphertext did not authenticate under the key and associated data.
    #[error("authentication failure: {0}")]
    AuthenticationFailure(String),

    /// Reading input or writing output failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Returns the process exit code that should be used for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::BadInput(_) => 2,
            ToolError::AuthenticationFailure(_) => 3,
            ToolError::Io(_) => 74,
            ToolError::Internal(_) => 1,
        }
    }

    /// Short machine-readable error code (e.g. `"bad_input"`).
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::BadInput(_) => "bad_input",
            ToolError::AuthenticationFailure(_) => "authentication_failure",
            ToolError::Io(_) => "io_error",
            ToolError::Internal(_) => "internal_error",
        }
    }
}

impl From<std::io::Error> for ToolError {
    fn from(e: std::io::Error) -> Self {
        ToolError::Io(e.to_string())
    }
}
