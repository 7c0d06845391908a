//! JOLT is a compact, typed, canonical binary representation of JSON-like
//! documents, suitable for hashing, cache keys, signatures, and message
//! queues, while remaining losslessly convertible to and from JSON.
//!
//! The crate is organized around a [`Value`] tree. Values are encoded with
//! [`encode`] into the tag-indexed wire form, decoded with [`decode`], mapped
//! to and from JSON through the [`json`] module, framed for stream transport
//! with [`write_frame`]/[`read_frame`], and sealed into an authenticated
//! envelope via the [`sec`] module.
//!
//! Encoding is deterministic: object keys sort ascending by UTF-8 bytes, set
//! elements and map entries sort ascending by their encoded bytes, so two
//! structurally equal values always produce byte-identical output.

mod tag;
mod wire;

pub mod comments;
pub mod config;
pub mod decode;
pub mod encode;
pub mod envelope;
pub mod frame;
pub mod json;
pub mod sec;

pub mod decimal;
pub use decimal::Decimal;

pub mod integer;
pub use integer::Int;

pub mod timestamp;
pub use timestamp::{Date, Time, Timestamp};

mod error;
pub use error::{Error, Result};

pub mod value;
pub use value::Value;

pub use uuid::Uuid;

pub use comments::strip_json_comments;
pub use config::CodecConfig;
pub use decode::{decode, decode_with};
pub use encode::{encode, encode_with};
pub use envelope::{Envelope, Meta};
pub use frame::{read_frame, write_frame};
pub use json::{from_json_bytes, from_json_value, marshal_json, to_json_value};

/// Nesting depth allowed by the default [`CodecConfig`], counted per
/// recursive container entry.
pub const MAX_DEPTH: usize = 1024;
/// Aggregate allocation allowed per top-level decode by the default
/// [`CodecConfig`]: 64 MiB.
pub const MAX_BYTES: usize = 64 << 20;

/// Media type for raw binary documents.
pub const MEDIA_TYPE: &str = "application/jolt";
/// Alias media type for raw binary documents.
pub const MEDIA_TYPE_BINARY: &str = "application/jolt-binary";
/// Media type for sealed envelopes.
pub const MEDIA_TYPE_SEALED: &str = "application/jolt-sec";
/// Media type for the JSON interop form.
pub const MEDIA_TYPE_JSON: &str = "application/json";
