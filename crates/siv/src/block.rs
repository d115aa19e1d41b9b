//! Raw AES block encryption, keyed by a single SIV sub-key.
//!
//! A SIV key is split into two halves of 16, 24 or 32 bytes; each half keys
//! its own [`BlockCipher`] of the matching AES variant. Only the forward
//! direction is ever needed: CMAC and CTR both run the cipher forwards.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use crate::error::KeyError;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// One 128-bit cipher block.
pub type Block = [u8; BLOCK_LEN];

/// AES instance sized by its key. Key schedules are wiped on drop.
#[derive(Clone)]
pub enum BlockCipher {
    /// 128-bit sub-key (256-bit SIV key).
    Aes128(Aes128),
    /// 192-bit sub-key (384-bit SIV key).
    Aes192(Aes192),
    /// 256-bit sub-key (512-bit SIV key).
    Aes256(Aes256),
}

impl BlockCipher {
    /// Build a cipher from a 16, 24 or 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BadKeySize`] for any other key length.
    pub fn new(key: &[u8]) -> Result<Self, KeyError> {
        let bad_size = || KeyError::BadKeySize {
            bits: key.len() * 8,
        };
        let cipher = match key.len() {
            16 => Self::Aes128(Aes128::new_from_slice(key).map_err(|_| bad_size())?),
            24 => Self::Aes192(Aes192::new_from_slice(key).map_err(|_| bad_size())?),
            32 => Self::Aes256(Aes256::new_from_slice(key).map_err(|_| bad_size())?),
            _ => return Err(bad_size()),
        };
        Ok(cipher)
    }

    /// Encrypt one block in place.
    pub fn encrypt_block(&self, block: &mut Block) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            Self::Aes128(c) => c.encrypt_block(block),
            Self::Aes192(c) => c.encrypt_block(block),
            Self::Aes256(c) => c.encrypt_block(block),
        }
    }

    /// Size of the key this cipher was built from, in bits.
    pub fn key_bits(&self) -> usize {
        match self {
            Self::Aes128(_) => 128,
            Self::Aes192(_) => 192,
            Self::Aes256(_) => 256,
        }
    }
}

impl std::fmt::Debug for BlockCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The round keys are key material.
        write!(f, "BlockCipher(AES-{}, [REDACTED])", self.key_bits())
    }
}

/// XOR `other` into `block`.
pub(crate) fn xor_in_place(block: &mut [u8], other: &[u8]) {
    for (b, o) in block.iter_mut().zip(other) {
        *b ^= o;
    }
}
