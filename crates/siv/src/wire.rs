//! Wire layout of a sealed message, and its text armor.
//!
//! # Binary form
//!
//! ```text
//! synthetic IV (16 bytes) || CTR ciphertext (plaintext length)
//! ```
//!
//! # Armored form
//!
//! ```text
//! siv1.<base64url-no-pad(iv)>.<base64url-no-pad(ciphertext)>
//! ```
//!
//! The `siv1` prefix leaves room for a future layout without breaking
//! existing armored strings.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::block::Block;
use crate::error::SivError;

/// Byte length of the synthetic IV that prefixes every ciphertext.
pub const IV_LEN: usize = 16;

/// Prefix that appears at the start of every armored ciphertext.
pub const ARMOR_PREFIX: &str = "siv1";

/// Split wire bytes into the synthetic IV and the CTR ciphertext.
///
/// # Errors
///
/// Returns [`SivError::InputTooShort`] if `wire` is shorter than [`IV_LEN`].
pub fn split(wire: &[u8]) -> Result<(&Block, &[u8]), SivError> {
    if wire.len() < IV_LEN {
        return Err(SivError::InputTooShort { len: wire.len() });
    }
    let (iv, ciphertext) = wire.split_at(IV_LEN);
    let iv = iv
        .try_into()
        .map_err(|_| SivError::InputTooShort { len: wire.len() })?;
    Ok((iv, ciphertext))
}

/// Concatenate a synthetic IV and its ciphertext into wire bytes.
pub fn join(iv: &Block, ciphertext: &[u8]) -> Vec<u8> {
    let mut wire = Vec::with_capacity(IV_LEN + ciphertext.len());
    wire.extend_from_slice(iv);
    wire.extend_from_slice(ciphertext);
    wire
}

/// A sealed message with its synthetic IV held apart from the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// Synthetic IV; doubles as the authentication tag.
    pub iv: Block,
    /// CTR ciphertext, as long as the plaintext.
    pub ciphertext: Vec<u8>,
}

impl SealedMessage {
    /// Parse wire bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SivError::InputTooShort`] if `wire` is shorter than [`IV_LEN`].
    pub fn from_wire(wire: &[u8]) -> Result<Self, SivError> {
        let (iv, ciphertext) = split(wire)?;
        Ok(Self {
            iv: *iv,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Encode to wire bytes.
    pub fn to_wire(&self) -> Vec<u8> {
        join(&self.iv, &self.ciphertext)
    }

    /// Length of the wire encoding.
    pub fn wire_len(&self) -> usize {
        IV_LEN + self.ciphertext.len()
    }
}

impl fmt::Display for SealedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            ARMOR_PREFIX,
            URL_SAFE_NO_PAD.encode(self.iv),
            URL_SAFE_NO_PAD.encode(&self.ciphertext),
        )
    }
}

impl FromStr for SealedMessage {
    type Err = SivError;

    /// Parse an armored `siv1.<iv>.<ciphertext>` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().splitn(3, '.').collect();
        if parts.len() != 3 || parts[0] != ARMOR_PREFIX {
            return Err(SivError::InvalidFormat);
        }
        let iv_bytes = URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|_| SivError::InvalidFormat)?;
        let iv: Block = iv_bytes
            .as_slice()
            .try_into()
            .map_err(|_| SivError::InvalidFormat)?;

        let ciphertext = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| SivError::InvalidFormat)?;

        Ok(Self { iv, ciphertext })
    }
}
