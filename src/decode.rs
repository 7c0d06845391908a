//! Binary decoder.
//!
//! Decoding is guarded two ways: container nesting is counted against the
//! configured depth limit, and allocation is counted against the configured
//! byte limit — both up front against the input length and as a running
//! total while parsing, so a small input declaring a huge container fails
//! before anything is reserved for it.

use std::collections::{BTreeMap, BTreeSet};

use num_bigint::BigUint;
use uuid::Uuid;

use crate::config::CodecConfig;
use crate::decimal::Decimal;
use crate::envelope::{Envelope, Meta};
use crate::error::{Error, Result};
use crate::integer::Int;
use crate::tag::Tag;
use crate::timestamp::{Date, Time, Timestamp};
use crate::value::{Value, COMMENT_KEY};
use crate::wire::Reader;

/// Decode one value with the default configuration.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    decode_with(bytes, &CodecConfig::default())
}

/// Decode one value, honoring the config's limits and `$comment` handling.
///
/// Bytes past the first complete value are ignored; framing is the
/// transport's job.
pub fn decode_with(bytes: &[u8], config: &CodecConfig) -> Result<Value> {
    if bytes.len() > config.max_bytes {
        return Err(Error::TooLarge {
            max: config.max_bytes,
            actual: bytes.len(),
        });
    }
    let mut dec = Decoder {
        rd: Reader::new(bytes),
        config,
        allocated: 0,
    };
    dec.decode_value(0)
}

struct Decoder<'a> {
    rd: Reader<'a>,
    config: &'a CodecConfig,
    allocated: usize,
}

impl<'a> Decoder<'a> {
    /// Count `n` bytes against the allocation budget.
    fn charge(&mut self, n: usize) -> Result<()> {
        self.allocated = self.allocated.saturating_add(n);
        if self.allocated > self.config.max_bytes {
            return Err(Error::TooLarge {
                max: self.config.max_bytes,
                actual: self.allocated,
            });
        }
        Ok(())
    }

    fn read_text(&mut self, context: &'static str) -> Result<String> {
        let bytes = self.rd.read_len_bytes(context)?;
        self.charge(bytes.len())?;
        let s = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8(context))?;
        Ok(s.to_string())
    }

    /// Read a container count, charging for it up front so a forged count
    /// cannot drive a huge reservation.
    fn read_count(&mut self, context: &'static str) -> Result<usize> {
        let count = self.rd.read_uvarint(context)? as usize;
        self.charge(count)?;
        Ok(count)
    }

    fn decode_value(&mut self, depth: usize) -> Result<Value> {
        if depth > self.config.max_depth {
            return Err(Error::TooDeep(self.config.max_depth));
        }
        let byte = self.rd.read_byte("tag")?;
        let tag = Tag::from_u8(byte).ok_or(Error::UnknownTag(byte))?;
        Ok(match tag {
            Tag::Null => Value::Null,
            Tag::False => Value::Bool(false),
            Tag::True => Value::Bool(true),
            Tag::Str => Value::Str(self.read_text("string")?),
            Tag::Ts => Value::Ts(Timestamp::from_literal(self.read_text("timestamp")?)),
            Tag::Date => Value::Date(Date::from_literal(self.read_text("date")?)),
            Tag::Time => Value::Time(Time::from_literal(self.read_text("time")?)),
            Tag::Link => Value::Link(self.read_text("link")?),
            Tag::Annot => Value::Annot(self.read_text("annotation")?),
            Tag::Bin => {
                let bytes = self.rd.read_len_bytes("binary")?;
                self.charge(bytes.len())?;
                Value::Bin(bytes.to_vec())
            }
            Tag::Int => {
                let len = self.rd.read_uvarint("integer length")? as usize;
                if len == 0 {
                    Value::Int(Int::zero())
                } else {
                    let sign = self.rd.read_byte("integer sign")?;
                    let mag = self.rd.read_bytes(len - 1, "integer magnitude")?;
                    self.charge(len)?;
                    Value::Int(Int::from_sign_magnitude(sign == 0x01, mag))
                }
            }
            Tag::Dec => {
                let sign = self.rd.read_byte("decimal sign")?;
                let exp = self.rd.read_zigzag("decimal exponent")?;
                let exp = i32::try_from(exp)
                    .map_err(|_| Error::InvalidNumber(format!("exponent {}", exp)))?;
                let coeff = self.rd.read_len_bytes("decimal coefficient")?;
                self.charge(coeff.len())?;
                Value::Dec(Decimal::from_parts(
                    sign == 0x01,
                    BigUint::from_bytes_be(coeff),
                    exp,
                ))
            }
            Tag::Uuid => {
                let bytes = self.rd.read_bytes(16, "uuid")?;
                self.charge(16)?;
                let mut raw = [0u8; 16];
                raw.copy_from_slice(bytes);
                Value::Uuid(Uuid::from_bytes(raw))
            }
            Tag::Arr => {
                let count = self.read_count("array count")?;
                let mut items = Vec::new();
                for _ in 0..count {
                    items.push(self.decode_value(depth + 1)?);
                }
                Value::Arr(items)
            }
            Tag::Obj => {
                let count = self.read_count("object count")?;
                let mut map = BTreeMap::new();
                for _ in 0..count {
                    let key = self.read_text("object key")?;
                    let val = self.decode_value(depth + 1)?;
                    if key == COMMENT_KEY && !self.config.preserve_comments {
                        continue;
                    }
                    map.insert(key, val);
                }
                Value::Obj(map)
            }
            Tag::Set => {
                let count = self.read_count("set count")?;
                let mut items = BTreeSet::new();
                for _ in 0..count {
                    items.insert(self.decode_value(depth + 1)?);
                }
                Value::Set(items)
            }
            Tag::Map => {
                let count = self.read_count("map count")?;
                let mut entries = BTreeMap::new();
                for _ in 0..count {
                    let key = self.decode_value(depth + 1)?;
                    let val = self.decode_value(depth + 1)?;
                    if entries.insert(key, val).is_some() {
                        return Err(Error::DuplicateMapKey);
                    }
                }
                Value::Map(entries)
            }
            Tag::Env => {
                let meta = match self.decode_value(depth + 1)? {
                    Value::Obj(map) => Meta::from_obj(map)?,
                    _ => return Err(Error::InvalidEnvelope),
                };
                let body = self.decode_value(depth + 1)?;
                Value::Env(Box::new(Envelope { meta, body }))
            }
        })
    }
}
