//! S2V: folds an ordered vector of strings into one 128-bit synthetic IV.
//!
//! Associated-data elements are consumed in order and the plaintext is always
//! the final string, so the chain never runs on an empty vector.

use zeroize::Zeroizing;

use crate::block::{xor_in_place, Block, BLOCK_LEN};
use crate::cmac::{dbl, pad, Cmac};

/// Compute the synthetic IV of `plaintext` under `associated_data`.
pub fn s2v(mac: &Cmac, associated_data: &[&[u8]], plaintext: &[u8]) -> Block {
    let mut d = Zeroizing::new(mac.mac(&[0u8; BLOCK_LEN]));

    for element in associated_data {
        let mut next = dbl(&d);
        xor_in_place(&mut next, &mac.mac(element));
        *d = next;
    }

    if plaintext.len() >= BLOCK_LEN {
        // xorend: D lands on the last 16 bytes of the plaintext.
        let mut t = Zeroizing::new(plaintext.to_vec());
        let tail = t.len() - BLOCK_LEN;
        xor_in_place(&mut t[tail..], &*d);
        mac.mac(&t)
    } else {
        let mut t = Zeroizing::new(dbl(&d));
        xor_in_place(&mut *t, &pad(plaintext));
        mac.mac(&*t)
    }
}
