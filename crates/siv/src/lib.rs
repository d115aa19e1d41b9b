//! AES-SIV (RFC 5297): deterministic, nonce-misuse-resistant authenticated
//! encryption with associated data.
//!
//! Components, leaves first:
//!
//! - [`block`]: raw AES block encryption for one sub-key.
//! - [`cmac`]: AES-CMAC with its doubling subkey derivation.
//! - [`s2v`]: the S2V chain turning associated data and plaintext into a synthetic IV.
//! - [`ctr`]: the CTR keystream seeded by that IV.
//! - [`SivContext`]: key splitting plus encrypt/decrypt.
//! - [`wire`]: the `iv || ciphertext` layout and its `siv1.` text armor.
//!
//! ```
//! let ctx = siv::setup(&[0u8; 32])?;
//! let sealed = ctx.encrypt(b"hello", &[b"header"])?;
//! assert_eq!(sealed.len(), 5 + siv::IV_LEN);
//! assert_eq!(ctx.decrypt(&sealed, &[b"header"])?, b"hello");
//! # Ok::<(), siv::SivError>(())
//! ```

pub mod block;
pub mod cmac;
pub mod ctr;
pub mod error;
pub mod s2v;
pub mod wire;

mod context;

pub use context::{KeySize, SivContext, MAX_ASSOCIATED_DATA};
pub use error::{KeyError, SivError};
pub use wire::{SealedMessage, IV_LEN};

/// Build a [`SivContext`] from a 256, 384 or 512-bit key.
///
/// # Errors
///
/// Returns [`SivError::Key`] if the key is empty or of an unsupported size.
pub fn setup(key: &[u8]) -> Result<SivContext, SivError> {
    SivContext::new(key)
}
