//! Library error types.

use thiserror::Error;

/// A JOLT Result, normally returning a JOLT [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any failure that can occur while constructing, encoding, decoding,
/// framing, or sealing a value.
///
/// The cryptographic variants deliberately carry little detail: once the
/// sealed blob has parsed, every failure collapses into
/// [`DecryptionFailed`](Error::DecryptionFailed) so that a caller relaying
/// errors cannot be used as a padding or key oracle.
#[derive(Debug, Error)]
pub enum Error {
    /// Decoder hit a tag byte with no assigned variant.
    #[error("unknown tag 0x{0:02x}")]
    UnknownTag(u8),

    /// Input ended inside a length-prefixed field.
    #[error("unexpected end of input while reading {0}")]
    Truncated(&'static str),

    /// A string field held bytes that are not valid UTF-8.
    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    /// An envelope's meta slot decoded to something other than an object.
    #[error("envelope meta is not an object")]
    InvalidEnvelope,

    /// The JSON layer was handed input it could not parse or rewrite.
    #[error("bad JSON: {0}")]
    BadJson(String),

    /// A keyed map carried two entries whose keys share a canonical
    /// encoding.
    #[error("duplicate map key")]
    DuplicateMapKey,

    /// Container nesting exceeded the configured depth limit.
    #[error("nesting depth exceeded (limit {0})")]
    TooDeep(usize),

    /// Decoding would allocate more than the configured byte limit.
    #[error("decoded size {actual} exceeds limit {max}")]
    TooLarge { max: usize, actual: usize },

    /// A native value has no wire representation.
    #[error("unsupported value: {0}")]
    UnsupportedType(&'static str),

    /// A numeric literal did not match the accepted grammar.
    #[error("invalid number literal {0:?}")]
    InvalidNumber(String),

    /// A UUID literal did not parse as a hyphenated UUID.
    #[error("invalid UUID literal {0:?}")]
    InvalidUuid(String),

    /// A temporal literal did not match its expected shape.
    #[error("invalid {kind} literal {text:?}")]
    InvalidTimestamp { kind: &'static str, text: String },

    /// Sealed blob did not start with the `JSEC` magic.
    #[error("bad magic")]
    BadMagic,

    /// Sealed blob used a format version this build does not speak.
    #[error("unsupported version {0}")]
    UnsupportedVersion(u8),

    /// The named AEAD suite is not in the registry.
    #[error("unsupported AEAD algorithm {0:?}")]
    UnsupportedAlg(String),

    /// The keyring has no key under the requested id.
    #[error("key {0:?} not found")]
    UnknownKey(String),

    /// The resolved key's length does not match the suite.
    #[error("key length {actual} does not match {alg} (expected {expected})")]
    KeyLengthMismatch {
        alg: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The authenticated header disagrees with the blob's plain fields.
    #[error("sealed header does not match blob fields")]
    HeaderMismatch,

    /// The AEAD rejected the blob, or an equivalent post-parse failure.
    #[error("decryption failed")]
    DecryptionFailed,

    /// A frame declared more payload bytes than the stream delivered.
    #[error("short read: expected {expected} payload bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    /// An underlying stream error from the frame transport.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
