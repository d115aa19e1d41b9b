//! JSON envelopes written by callers in machine-readable mode.
//!
//! Binary values are base64 (standard alphabet, padded); ciphertexts use the
//! `siv1.` armored form.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encrypt
// ---------------------------------------------------------------------------

/// Result of a successful encryption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Armored ciphertext, `siv1.<iv>.<ciphertext>`.
    pub ciphertext: String,
    /// Number of plaintext bytes sealed.
    pub plaintext_len: usize,
    /// Number of associated-data elements authenticated.
    pub associated_data_count: usize,
}

// ---------------------------------------------------------------------------
// Decrypt
// ---------------------------------------------------------------------------

/// Result of a successful decryption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Recovered plaintext, base64-encoded.
    pub plaintext: String,
    /// Number of plaintext bytes recovered.
    pub plaintext_len: usize,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body written instead of a result when a command fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_input"`).
    pub code: String,
    /// Human-readable description. Never contains key material or plaintext.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ToolError> for ErrorResponse {
    fn from(e: &crate::ToolError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}
