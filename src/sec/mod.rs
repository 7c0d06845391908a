//! Authenticated-encryption envelope for sealed documents.
//!
//! A sealed blob is `JSEC || 0x01` followed by uvarint-length-prefixed
//! fields in fixed order: algorithm name, key id, nonce, AAD, ciphertext.
//! The AAD is the deterministic JSON serialization of the header
//! `{alg, kid, extra}` — the exact bytes on the wire — so the algorithm,
//! key id, and any caller context in `extra` are authenticated end to end.
//! Callers bind request context (method, path, tenant) through `extra`;
//! verifying those bindings after decryption is the caller's job.

mod keyring;
mod suite;

pub use keyring::{Keyring, StaticKeyring};
pub use suite::Alg;

use std::collections::BTreeMap;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::decode::decode_with;
use crate::encode::encode_with;
use crate::error::{Error, Result};
use crate::value::Value;
use crate::wire::{put_len_bytes, Reader};

const MAGIC: &[u8; 4] = b"JSEC";
const VERSION: u8 = 0x01;

/// Sealing parameters, authenticated via the AAD.
///
/// Field order matters: the AAD is this struct's JSON serialization, and
/// interop requires `alg`, `kid`, `extra` in exactly that order with
/// `extra` always present (empty object when unused) and its keys sorted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// AEAD suite to seal with.
    pub alg: Alg,
    /// Key id resolved through the keyring.
    pub kid: String,
    /// Caller-supplied context, opaque to the wrapper but authenticated.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Header {
    pub fn new(alg: Alg, kid: impl Into<String>) -> Header {
        Header {
            alg,
            kid: kid.into(),
            extra: BTreeMap::new(),
        }
    }

    fn aad_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::BadJson(e.to_string()))
    }
}

/// Canonicalize `value` to its binary form and seal it under the header's
/// suite and key, with a fresh random nonce. Uses the default codec
/// configuration.
pub fn encrypt(value: &Value, header: &Header, keyring: &impl Keyring) -> Result<Vec<u8>> {
    encrypt_with(value, header, keyring, &CodecConfig::default())
}

/// Seal with an explicit codec configuration for the plaintext encoding.
pub fn encrypt_with(
    value: &Value,
    header: &Header,
    keyring: &impl Keyring,
    config: &CodecConfig,
) -> Result<Vec<u8>> {
    let key = keyring
        .get(&header.kid)
        .ok_or_else(|| Error::UnknownKey(header.kid.clone()))?;
    header.alg.check_key(key)?;

    let plaintext = encode_with(value, config)?;

    let mut nonce = vec![0u8; header.alg.nonce_len()];
    OsRng.fill_bytes(&mut nonce);

    let aad = header.aad_bytes()?;
    let ciphertext = header.alg.seal(key, &nonce, &plaintext, &aad)?;

    let mut blob = Vec::with_capacity(
        MAGIC.len() + 1 + header.alg.name().len() + header.kid.len() + nonce.len()
            + aad.len() + ciphertext.len() + 16,
    );
    blob.extend_from_slice(MAGIC);
    blob.push(VERSION);
    put_len_bytes(&mut blob, header.alg.name().as_bytes());
    put_len_bytes(&mut blob, header.kid.as_bytes());
    put_len_bytes(&mut blob, &nonce);
    put_len_bytes(&mut blob, &aad);
    put_len_bytes(&mut blob, &ciphertext);
    Ok(blob)
}

/// Open a sealed blob and decode the plaintext, returning the value and
/// the authenticated header. Uses the default codec configuration.
pub fn decrypt(blob: &[u8], keyring: &impl Keyring) -> Result<(Value, Header)> {
    decrypt_with(blob, keyring, &CodecConfig::default())
}

/// Open with an explicit codec configuration for the plaintext decoding.
///
/// Structural problems before the AEAD runs (magic, version, unknown
/// algorithm, header/field mismatch) are reported specifically; once the
/// blob has parsed, every cryptographic failure is
/// [`DecryptionFailed`](Error::DecryptionFailed).
pub fn decrypt_with(
    blob: &[u8],
    keyring: &impl Keyring,
    config: &CodecConfig,
) -> Result<(Value, Header)> {
    let mut rd = Reader::new(blob);

    let magic = rd.read_bytes(MAGIC.len(), "magic").map_err(|_| Error::BadMagic)?;
    if magic != MAGIC.as_slice() {
        return Err(Error::BadMagic);
    }
    let version = rd.read_byte("version")?;
    if version != VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let alg_field = rd.read_len_bytes("algorithm")?;
    let alg_field =
        std::str::from_utf8(alg_field).map_err(|_| Error::InvalidUtf8("algorithm"))?;
    let alg = Alg::from_name(alg_field)?;

    let kid_field = rd.read_len_bytes("key id")?;
    let kid_field = std::str::from_utf8(kid_field).map_err(|_| Error::InvalidUtf8("key id"))?;

    let nonce = rd.read_len_bytes("nonce")?;
    let aad = rd.read_len_bytes("aad")?;
    let ciphertext = rd.read_len_bytes("ciphertext")?;

    let header: Header =
        serde_json::from_slice(aad).map_err(|e| Error::BadJson(e.to_string()))?;
    if header.kid != kid_field || header.alg != alg {
        return Err(Error::HeaderMismatch);
    }

    let key = keyring
        .get(&header.kid)
        .ok_or_else(|| Error::UnknownKey(header.kid.clone()))?;
    alg.check_key(key)?;

    let plaintext = alg.open(key, nonce, ciphertext, aad)?;
    let value = decode_with(&plaintext, config)?;
    Ok((value, header))
}
