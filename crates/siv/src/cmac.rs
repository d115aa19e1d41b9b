//! AES-CMAC (RFC 4493 / NIST SP 800-38B) over arbitrary-length messages.
//!
//! # Subkeys
//!
//! ```text
//! L  = E(0^128)
//! K1 = dbl(L)
//! K2 = dbl(K1)
//! ```
//!
//! A message whose final block is full has that block XORed with `K1`; a
//! partial (or empty) final block is padded with `0x80 00..` and XORed with
//! `K2`. All earlier blocks are CBC-chained from a zero IV.

use zeroize::Zeroize;

use crate::block::{xor_in_place, Block, BlockCipher, BLOCK_LEN};

/// Reduction constant for GF(2^128) with the polynomial `x^128 + x^7 + x^2 + x + 1`.
const R_128: u128 = 0x87;

/// Multiply a block by `x` in GF(2^128): shift left one bit and fold the
/// carried-out bit back in through [`R_128`]. Runs without branching on data.
pub fn dbl(block: &Block) -> Block {
    let v = u128::from_be_bytes(*block);
    let carry = v >> 127;
    ((v << 1) ^ (carry * R_128)).to_be_bytes()
}

/// Pad a partial block with a single `0x80` byte followed by zeroes.
pub(crate) fn pad(partial: &[u8]) -> Block {
    debug_assert!(partial.len() < BLOCK_LEN);
    let mut block = [0u8; BLOCK_LEN];
    block[..partial.len()].copy_from_slice(partial);
    block[partial.len()] = 0x80;
    block
}

/// A keyed CMAC instance holding its cipher and derived subkeys.
#[derive(Clone)]
pub struct Cmac {
    cipher: BlockCipher,
    k1: Block,
    k2: Block,
}

impl Cmac {
    /// Key a CMAC instance with `cipher`, deriving `K1` and `K2`.
    pub fn new(cipher: BlockCipher) -> Self {
        let (k1, k2) = derive_subkeys(&cipher);
        Self { cipher, k1, k2 }
    }

    /// Compute the 128-bit tag of `message`. The empty message is valid.
    pub fn mac(&self, message: &[u8]) -> Block {
        // The last block is always held back for subkey treatment, even when
        // the message length is an exact multiple of the block size.
        let split = if message.is_empty() {
            0
        } else {
            (message.len() - 1) / BLOCK_LEN * BLOCK_LEN
        };
        let (head, last) = message.split_at(split);

        let mut state = [0u8; BLOCK_LEN];
        for chunk in head.chunks_exact(BLOCK_LEN) {
            xor_in_place(&mut state, chunk);
            self.cipher.encrypt_block(&mut state);
        }

        let mut last_block = if last.len() == BLOCK_LEN {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(last);
            xor_in_place(&mut block, &self.k1);
            block
        } else {
            let mut block = pad(last);
            xor_in_place(&mut block, &self.k2);
            block
        };

        xor_in_place(&mut state, &last_block);
        last_block.zeroize();
        self.cipher.encrypt_block(&mut state);
        state
    }
}

impl Drop for Cmac {
    fn drop(&mut self) {
        self.k1.zeroize();
        self.k2.zeroize();
    }
}

impl std::fmt::Debug for Cmac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cmac")
            .field("cipher", &self.cipher)
            .field("subkeys", &"[REDACTED]")
            .finish()
    }
}

/// Derive the CMAC subkeys `(K1, K2)` for `cipher`.
pub fn derive_subkeys(cipher: &BlockCipher) -> (Block, Block) {
    let mut l = [0u8; BLOCK_LEN];
    cipher.encrypt_block(&mut l);
    let k1 = dbl(&l);
    let k2 = dbl(&k1);
    l.zeroize();
    (k1, k2)
}
