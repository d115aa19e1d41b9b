//! Error types produced by the SIV core.

use thiserror::Error;

use crate::context::MAX_ASSOCIATED_DATA;
use crate::wire::IV_LEN;

/// Errors raised while validating key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The supplied key has zero length.
    #[error("key must be non-empty")]
    EmptyKey,

    /// The supplied key is not 256, 384 or 512 bits long.
    #[error("unsupported key size: {bits} bits (supported sizes are 256, 384 and 512 bits)")]
    BadKeySize {
        /// Size of the rejected key, in bits.
        bits: usize,
    },
}

/// Errors produced by the SIV layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SivError {
    /// The key could not be used to build a context.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The wire ciphertext cannot even hold a synthetic IV.
    #[error("ciphertext is {len} bytes, shorter than the {IV_LEN}-byte synthetic IV")]
    InputTooShort {
        /// Length of the rejected input.
        len: usize,
    },

    /// The recomputed synthetic IV does not match the one carried by the
    /// ciphertext: wrong key, wrong or reordered associated data, or tampering.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// More associated-data elements than S2V accepts.
    #[error("too many associated data elements: {count} (maximum is {MAX_ASSOCIATED_DATA})")]
    TooManyAssociatedData {
        /// Number of elements supplied.
        count: usize,
    },

    /// An armored ciphertext string does not match `siv1.<iv>.<ciphertext>`.
    #[error("invalid armored ciphertext format")]
    InvalidFormat,
}
