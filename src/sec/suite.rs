//! AEAD suite registry.

use std::fmt;

use aes_gcm::Aes256Gcm;
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A registered AEAD construction. The name is the wire identifier and the
/// AAD identifier; key and nonce lengths are fixed per suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alg {
    /// XChaCha20-Poly1305: 32-byte key, 24-byte nonce.
    XChaCha20Poly1305,
    /// AES-256 in GCM mode: 32-byte key, 12-byte nonce.
    Aes256Gcm,
}

impl Alg {
    /// The wire name.
    pub const fn name(&self) -> &'static str {
        match self {
            Alg::XChaCha20Poly1305 => "XCHACHA20-POLY1305",
            Alg::Aes256Gcm => "AES-256-GCM",
        }
    }

    /// Resolve a wire name, failing with
    /// [`UnsupportedAlg`](Error::UnsupportedAlg) for anything unregistered.
    pub fn from_name(name: &str) -> Result<Alg> {
        match name {
            "XCHACHA20-POLY1305" => Ok(Alg::XChaCha20Poly1305),
            "AES-256-GCM" => Ok(Alg::Aes256Gcm),
            other => Err(Error::UnsupportedAlg(other.to_string())),
        }
    }

    pub const fn key_len(&self) -> usize {
        32
    }

    pub const fn nonce_len(&self) -> usize {
        match self {
            Alg::XChaCha20Poly1305 => 24,
            Alg::Aes256Gcm => 12,
        }
    }

    /// Check a resolved key against the suite's key length.
    pub(crate) fn check_key(&self, key: &[u8]) -> Result<()> {
        if key.len() != self.key_len() {
            return Err(Error::KeyLengthMismatch {
                alg: self.name(),
                expected: self.key_len(),
                actual: key.len(),
            });
        }
        Ok(())
    }

    /// Seal plaintext under `key`/`nonce`, binding `aad`. The tag is
    /// appended to the returned ciphertext.
    pub(crate) fn seal(&self, key: &[u8], nonce: &[u8], msg: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        self.check_key(key)?;
        let payload = Payload { msg, aad };
        match self {
            Alg::XChaCha20Poly1305 => XChaCha20Poly1305::new_from_slice(key)
                .map_err(|_| Error::DecryptionFailed)?
                .encrypt(XNonce::from_slice(nonce), payload),
            Alg::Aes256Gcm => Aes256Gcm::new_from_slice(key)
                .map_err(|_| Error::DecryptionFailed)?
                .encrypt(aes_gcm::Nonce::from_slice(nonce), payload),
        }
        .map_err(|_| Error::DecryptionFailed)
    }

    /// Open ciphertext, verifying the tag and `aad`. Every failure is
    /// reported as [`DecryptionFailed`](Error::DecryptionFailed).
    pub(crate) fn open(&self, key: &[u8], nonce: &[u8], msg: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        self.check_key(key)?;
        if nonce.len() != self.nonce_len() {
            return Err(Error::DecryptionFailed);
        }
        let payload = Payload { msg, aad };
        match self {
            Alg::XChaCha20Poly1305 => XChaCha20Poly1305::new_from_slice(key)
                .map_err(|_| Error::DecryptionFailed)?
                .decrypt(XNonce::from_slice(nonce), payload),
            Alg::Aes256Gcm => Aes256Gcm::new_from_slice(key)
                .map_err(|_| Error::DecryptionFailed)?
                .decrypt(aes_gcm::Nonce::from_slice(nonce), payload),
        }
        .map_err(|_| Error::DecryptionFailed)
    }
}

impl fmt::Display for Alg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Alg {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Alg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Alg::from_name(&name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_are_two_way() {
        for alg in [Alg::XChaCha20Poly1305, Alg::Aes256Gcm] {
            assert_eq!(Alg::from_name(alg.name()).unwrap(), alg);
        }
        assert!(matches!(
            Alg::from_name("ROT13"),
            Err(Error::UnsupportedAlg(_))
        ));
    }

    #[test]
    fn seal_open_both_suites() {
        for alg in [Alg::XChaCha20Poly1305, Alg::Aes256Gcm] {
            let key = vec![7u8; alg.key_len()];
            let nonce = vec![9u8; alg.nonce_len()];
            let ct = alg.seal(&key, &nonce, b"payload", b"aad").unwrap();
            assert_ne!(ct, b"payload");
            let pt = alg.open(&key, &nonce, &ct, b"aad").unwrap();
            assert_eq!(pt, b"payload");
            assert!(matches!(
                alg.open(&key, &nonce, &ct, b"other"),
                Err(Error::DecryptionFailed)
            ));
        }
    }

    #[test]
    fn wrong_key_length_is_reported() {
        let alg = Alg::Aes256Gcm;
        let err = alg.seal(&[0u8; 16], &[0u8; 12], b"x", b"").unwrap_err();
        assert!(matches!(
            err,
            Error::KeyLengthMismatch {
                alg: "AES-256-GCM",
                expected: 32,
                actual: 16,
            }
        ));
    }
}
