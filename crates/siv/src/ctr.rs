//! CTR keystream keyed by the second SIV sub-key and seeded with the
//! synthetic IV.
//!
//! Before the IV becomes the initial counter block, the top bit of each of
//! its two low 32-bit words is cleared (RFC 5297 §2.5), so implementations
//! that only increment the low 32 or 64 bits stay interoperable. The counter
//! itself then advances as a full 128-bit big-endian integer.

use zeroize::Zeroize;

use crate::block::{xor_in_place, Block, BlockCipher, BLOCK_LEN};

/// Derive the initial counter block `Q = V & 1^64 0 1^31 0 1^31` from `iv`.
pub fn counter_block(iv: &Block) -> Block {
    let mut q = *iv;
    q[8] &= 0x7f;
    q[12] &= 0x7f;
    q
}

/// XOR the keystream `E(Q) || E(Q+1) || ...` into `buffer`.
///
/// Applying it twice with the same IV restores the input.
pub fn apply_keystream(cipher: &BlockCipher, iv: &Block, buffer: &mut [u8]) {
    let mut counter = u128::from_be_bytes(counter_block(iv));
    let mut keystream = [0u8; BLOCK_LEN];

    for chunk in buffer.chunks_mut(BLOCK_LEN) {
        keystream = counter.to_be_bytes();
        cipher.encrypt_block(&mut keystream);
        xor_in_place(chunk, &keystream);
        counter = counter.wrapping_add(1);
    }

    keystream.zeroize();
}
