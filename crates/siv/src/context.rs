//! [`SivContext`]: a keyed AES-SIV instance.
//!
//! The supplied key is split in half: the first half keys the S2V/CMAC chain,
//! the second half keys the CTR keystream.
//!
//! ```text
//! encrypt:  V = S2V(K1, AD_1..AD_n, P)      output V || CTR(K2, V, P)
//! decrypt:  P' = CTR(K2, V, C)              accept iff S2V(K1, AD_1..AD_n, P') == V
//! ```
//!
//! A context holds no per-call state. It is `Send + Sync` and may be shared
//! by reference across threads.

use std::fmt;

use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroize;

use crate::block::BlockCipher;
use crate::cmac::Cmac;
use crate::ctr::apply_keystream;
use crate::error::{KeyError, SivError};
use crate::s2v::s2v;
use crate::wire::{self, SealedMessage, IV_LEN};

/// Maximum number of associated-data elements accepted per call.
///
/// S2V handles at most 127 strings including the plaintext (RFC 5297 §7).
pub const MAX_ASSOCIATED_DATA: usize = 126;

/// Supported SIV key sizes. The name gives the total key size; each half is
/// an AES key of half that size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySize {
    /// 32-byte key, two AES-128 sub-keys.
    Aes256Siv,
    /// 48-byte key, two AES-192 sub-keys.
    Aes384Siv,
    /// 64-byte key, two AES-256 sub-keys.
    Aes512Siv,
}

impl KeySize {
    /// Classify a key by its byte length.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::EmptyKey`] for a zero length and
    /// [`KeyError::BadKeySize`] for anything other than 32, 48 or 64 bytes.
    pub fn from_len(len: usize) -> Result<Self, KeyError> {
        match len * 8 {
            0 => Err(KeyError::EmptyKey),
            256 => Ok(Self::Aes256Siv),
            384 => Ok(Self::Aes384Siv),
            512 => Ok(Self::Aes512Siv),
            bits => Err(KeyError::BadKeySize { bits }),
        }
    }

    /// Total key size in bits.
    pub fn bits(self) -> usize {
        match self {
            Self::Aes256Siv => 256,
            Self::Aes384Siv => 384,
            Self::Aes512Siv => 512,
        }
    }

    /// Total key size in bytes.
    pub fn byte_len(self) -> usize {
        self.bits() / 8
    }
}

/// A keyed AES-SIV context.
#[derive(Clone)]
pub struct SivContext {
    mac: Cmac,
    ctr: BlockCipher,
    key_size: KeySize,
}

impl SivContext {
    /// Build a context from a 32, 48 or 64-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`SivError::Key`] if the key is empty or of an unsupported size.
    pub fn new(key: &[u8]) -> Result<Self, SivError> {
        let key_size = KeySize::from_len(key.len())?;
        let (mac_key, ctr_key) = key.split_at(key.len() / 2);

        let ctx = Self {
            mac: Cmac::new(BlockCipher::new(mac_key)?),
            ctr: BlockCipher::new(ctr_key)?,
            key_size,
        };
        debug!(key_bits = key_size.bits(), "SIV context initialised");
        Ok(ctx)
    }

    /// Size of the key this context was built from.
    pub fn key_size(&self) -> KeySize {
        self.key_size
    }

    /// Encrypt `plaintext`, authenticating it together with `associated_data`.
    ///
    /// Returns `iv || ciphertext`, exactly [`IV_LEN`] bytes longer than the
    /// plaintext. The same inputs always produce the same output.
    ///
    /// # Errors
    ///
    /// Returns [`SivError::TooManyAssociatedData`] if more than
    /// [`MAX_ASSOCIATED_DATA`] elements are supplied.
    pub fn encrypt(&self, plaintext: &[u8], associated_data: &[&[u8]]) -> Result<Vec<u8>, SivError> {
        check_associated_data(associated_data)?;
        let iv = s2v(&self.mac, associated_data, plaintext);

        let mut wire = wire::join(&iv, plaintext);
        apply_keystream(&self.ctr, &iv, &mut wire[IV_LEN..]);
        Ok(wire)
    }

    /// Authenticate and decrypt wire bytes produced by [`SivContext::encrypt`].
    ///
    /// `associated_data` must match the encrypting call element for element,
    /// in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`SivError::InputTooShort`] if `wire` cannot hold an IV,
    /// [`SivError::TooManyAssociatedData`] for an oversized vector, and
    /// [`SivError::AuthenticationFailed`] if the synthetic IV does not verify.
    /// No plaintext is released on failure.
    pub fn decrypt(&self, wire: &[u8], associated_data: &[&[u8]]) -> Result<Vec<u8>, SivError> {
        let (iv, ciphertext) = wire::split(wire)?;
        self.open(iv, ciphertext, associated_data)
    }

    /// Encrypt into a [`SealedMessage`] rather than flat wire bytes.
    ///
    /// # Errors
    ///
    /// Same as [`SivContext::encrypt`].
    pub fn encrypt_to_message(
        &self,
        plaintext: &[u8],
        associated_data: &[&[u8]],
    ) -> Result<SealedMessage, SivError> {
        check_associated_data(associated_data)?;
        let iv = s2v(&self.mac, associated_data, plaintext);

        let mut ciphertext = plaintext.to_vec();
        apply_keystream(&self.ctr, &iv, &mut ciphertext);
        Ok(SealedMessage { iv, ciphertext })
    }

    /// Authenticate and decrypt a [`SealedMessage`].
    ///
    /// # Errors
    ///
    /// Same as [`SivContext::decrypt`], minus the length check.
    pub fn decrypt_message(
        &self,
        message: &SealedMessage,
        associated_data: &[&[u8]],
    ) -> Result<Vec<u8>, SivError> {
        self.open(&message.iv, &message.ciphertext, associated_data)
    }

    fn open(
        &self,
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
        associated_data: &[&[u8]],
    ) -> Result<Vec<u8>, SivError> {
        check_associated_data(associated_data)?;

        let mut plaintext = ciphertext.to_vec();
        apply_keystream(&self.ctr, iv, &mut plaintext);

        let expected = s2v(&self.mac, associated_data, &plaintext);
        if bool::from(expected[..].ct_eq(&iv[..])) {
            Ok(plaintext)
        } else {
            plaintext.zeroize();
            Err(SivError::AuthenticationFailed)
        }
    }
}

impl fmt::Debug for SivContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material, not even in debug builds.
        write!(f, "SivContext({:?}, [REDACTED])", self.key_size)
    }
}

fn check_associated_data(associated_data: &[&[u8]]) -> Result<(), SivError> {
    if associated_data.len() > MAX_ASSOCIATED_DATA {
        return Err(SivError::TooManyAssociatedData {
            count: associated_data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_ctx() -> SivContext {
        SivContext::new(&[0u8; 32]).unwrap()
    }

    #[test]
    fn key_size_classification() {
        assert_eq!(KeySize::from_len(32), Ok(KeySize::Aes256Siv));
        assert_eq!(KeySize::from_len(48), Ok(KeySize::Aes384Siv));
        assert_eq!(KeySize::from_len(64), Ok(KeySize::Aes512Siv));
        assert_eq!(KeySize::from_len(0), Err(KeyError::EmptyKey));
        assert_eq!(
            KeySize::from_len(16),
            Err(KeyError::BadKeySize { bits: 128 })
        );
        assert_eq!(KeySize::Aes384Siv.byte_len(), 48);
    }

    #[test]
    fn setup_rejects_unsupported_lengths() {
        assert_eq!(
            SivContext::new(&[]).unwrap_err(),
            SivError::Key(KeyError::EmptyKey)
        );
        for len in [16, 20, 100] {
            assert_eq!(
                SivContext::new(&vec![0u8; len]).unwrap_err(),
                SivError::Key(KeyError::BadKeySize { bits: len * 8 })
            );
        }
    }

    #[test]
    fn setup_accepts_supported_lengths() {
        for (len, size) in [
            (32, KeySize::Aes256Siv),
            (48, KeySize::Aes384Siv),
            (64, KeySize::Aes512Siv),
        ] {
            assert_eq!(SivContext::new(&vec![1u8; len]).unwrap().key_size(), size);
        }
    }

    #[test]
    fn hello_vector() {
        let wire = zero_ctx().encrypt(b"hello", &[]).unwrap();
        assert_eq!(wire.len(), 21);
        assert_eq!(hex::encode(&wire), "5c5ad905296274d0d5416d4a648975ca9b619486ac");
    }

    #[test]
    fn empty_plaintext_is_a_bare_iv() {
        let ctx = zero_ctx();
        let wire = ctx.encrypt(b"", &[]).unwrap();
        assert_eq!(hex::encode(&wire), "b0f7a0dfbe76c85b5e29bb31aaecfc77");
        assert_eq!(ctx.decrypt(&wire, &[]).unwrap(), b"");
    }

    #[test]
    fn round_trip_with_associated_data() {
        let ctx = SivContext::new(&[0x42u8; 64]).unwrap();
        let ad: [&[u8]; 3] = [b"header", b"", b"nonce"];
        let wire = ctx.encrypt(b"attack at dawn", &ad).unwrap();
        assert_eq!(ctx.decrypt(&wire, &ad).unwrap(), b"attack at dawn");
    }

    #[test]
    fn encryption_is_deterministic() {
        let ctx = zero_ctx();
        let a = ctx.encrypt(b"same", &[b"ad"]).unwrap();
        let b = ctx.encrypt(b"same", &[b"ad"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn reordered_associated_data_fails() {
        let ctx = zero_ctx();
        let wire = ctx.encrypt(b"payload", &[b"one", b"two"]).unwrap();
        assert_ne!(wire, ctx.encrypt(b"payload", &[b"two", b"one"]).unwrap());
        assert_eq!(
            ctx.decrypt(&wire, &[b"two", b"one"]).unwrap_err(),
            SivError::AuthenticationFailed
        );
    }

    #[test]
    fn missing_associated_data_fails() {
        let ctx = zero_ctx();
        let wire = ctx.encrypt(b"payload", &[b"one"]).unwrap();
        assert!(ctx.decrypt(&wire, &[]).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let enc = SivContext::new(&[b'0'; 32]).unwrap();
        let dec = SivContext::new(&[b'1'; 32]).unwrap();
        let wire = enc.encrypt(b"test", &[]).unwrap();
        assert_eq!(
            dec.decrypt(&wire, &[]).unwrap_err(),
            SivError::AuthenticationFailed
        );
    }

    #[test]
    fn every_single_bit_flip_is_detected() {
        let ctx = zero_ctx();
        let wire = ctx.encrypt(b"tamper me", &[b"ad"]).unwrap();
        for bit in 0..wire.len() * 8 {
            let mut tampered = wire.clone();
            tampered[bit / 8] ^= 1 << (bit % 8);
            assert_eq!(
                ctx.decrypt(&tampered, &[b"ad"]).unwrap_err(),
                SivError::AuthenticationFailed,
                "bit {bit}"
            );
        }
    }

    #[test]
    fn truncated_input_rejected() {
        let ctx = zero_ctx();
        assert_eq!(
            ctx.decrypt(&[0u8; 15], &[]).unwrap_err(),
            SivError::InputTooShort { len: 15 }
        );
    }

    #[test]
    fn associated_data_limit() {
        let ctx = zero_ctx();
        let at_limit = vec![&b"x"[..]; MAX_ASSOCIATED_DATA];
        let wire = ctx.encrypt(b"p", &at_limit).unwrap();
        assert_eq!(ctx.decrypt(&wire, &at_limit).unwrap(), b"p");

        let over = vec![&b"x"[..]; MAX_ASSOCIATED_DATA + 1];
        assert_eq!(
            ctx.encrypt(b"p", &over).unwrap_err(),
            SivError::TooManyAssociatedData { count: 127 }
        );
        assert_eq!(
            ctx.decrypt(&wire, &over).unwrap_err(),
            SivError::TooManyAssociatedData { count: 127 }
        );
    }

    #[test]
    fn message_api_matches_wire_api() {
        let ctx = SivContext::new(&[9u8; 48]).unwrap();
        let msg = ctx.encrypt_to_message(b"structured", &[b"ad"]).unwrap();
        assert_eq!(msg.to_wire(), ctx.encrypt(b"structured", &[b"ad"]).unwrap());
        assert_eq!(ctx.decrypt_message(&msg, &[b"ad"]).unwrap(), b"structured");

        let mut forged = msg.clone();
        forged.iv[0] ^= 1;
        assert!(ctx.decrypt_message(&forged, &[b"ad"]).is_err());
    }

    #[test]
    fn shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SivContext>();

        let ctx = zero_ctx();
        let expected = ctx.encrypt(b"hello", &[]).unwrap();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        let wire = ctx.encrypt(b"hello", &[]).unwrap();
                        assert_eq!(wire, expected);
                        assert_eq!(ctx.decrypt(&wire, &[]).unwrap(), b"hello");
                    }
                });
            }
        });
    }

    #[test]
    fn debug_is_redacted() {
        let s = format!("{:?}", zero_ctx());
        assert!(s.contains("REDACTED"));
        assert!(s.contains("Aes256Siv"));
    }
}
