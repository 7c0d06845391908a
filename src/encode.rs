//! Canonical binary encoder.
//!
//! Output is deterministic: object keys are emitted in ascending UTF-8 byte
//! order, set elements and map entries in ascending order of their complete
//! encoded bytes. Two structurally equal values therefore always encode to
//! identical buffers, which is what makes the format usable for hashing and
//! cache keys.

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::tag::Tag;
use crate::value::{Value, COMMENT_KEY};
use crate::wire::{put_len_bytes, put_uvarint, zigzag_encode};

/// Encode a value with the default configuration.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    encode_with(value, &CodecConfig::default())
}

/// Encode a value, honoring the config's depth limit and `$comment`
/// handling.
pub fn encode_with(value: &Value, config: &CodecConfig) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_value(&mut buf, value, 0, config)?;
    Ok(buf)
}

fn encode_value(buf: &mut Vec<u8>, value: &Value, depth: usize, config: &CodecConfig) -> Result<()> {
    if depth > config.max_depth {
        return Err(Error::TooDeep(config.max_depth));
    }
    match value {
        Value::Null => buf.push(Tag::Null.into()),
        Value::Bool(v) => buf.push(if *v { Tag::True } else { Tag::False }.into()),
        Value::Int(v) => {
            buf.push(Tag::Int.into());
            if v.is_zero() {
                put_uvarint(buf, 0);
            } else {
                let mag = v.magnitude_bytes();
                put_uvarint(buf, (mag.len() + 1) as u64);
                buf.push(if v.is_negative() { 0x01 } else { 0x00 });
                buf.extend_from_slice(&mag);
            }
        }
        Value::Dec(v) => {
            buf.push(Tag::Dec.into());
            buf.push(if v.is_negative() { 0x01 } else { 0x00 });
            put_uvarint(buf, zigzag_encode(v.exponent() as i64));
            put_len_bytes(buf, &v.coefficient_bytes());
        }
        Value::Str(v) => {
            buf.push(Tag::Str.into());
            put_len_bytes(buf, v.as_bytes());
        }
        Value::Bin(v) => {
            buf.push(Tag::Bin.into());
            put_len_bytes(buf, v);
        }
        Value::Ts(v) => {
            buf.push(Tag::Ts.into());
            put_len_bytes(buf, v.as_str().as_bytes());
        }
        Value::Date(v) => {
            buf.push(Tag::Date.into());
            put_len_bytes(buf, v.as_str().as_bytes());
        }
        Value::Time(v) => {
            buf.push(Tag::Time.into());
            put_len_bytes(buf, v.as_str().as_bytes());
        }
        Value::Uuid(v) => {
            buf.push(Tag::Uuid.into());
            buf.extend_from_slice(v.as_bytes());
        }
        Value::Link(v) => {
            buf.push(Tag::Link.into());
            put_len_bytes(buf, v.as_bytes());
        }
        Value::Annot(v) => {
            buf.push(Tag::Annot.into());
            put_len_bytes(buf, v.as_bytes());
        }
        Value::Arr(items) => {
            buf.push(Tag::Arr.into());
            put_uvarint(buf, items.len() as u64);
            for item in items {
                encode_value(buf, item, depth + 1, config)?;
            }
        }
        Value::Obj(map) => {
            buf.push(Tag::Obj.into());
            // BTreeMap iteration is already ascending by UTF-8 bytes.
            let keep = |k: &str| config.preserve_comments || k != COMMENT_KEY;
            put_uvarint(buf, map.keys().filter(|k| keep(k)).count() as u64);
            for (key, val) in map {
                if !keep(key) {
                    continue;
                }
                put_len_bytes(buf, key.as_bytes());
                encode_value(buf, val, depth + 1, config)?;
            }
        }
        Value::Set(items) => {
            buf.push(Tag::Set.into());
            let mut encoded: Vec<Vec<u8>> = Vec::with_capacity(items.len());
            for item in items {
                let mut tmp = Vec::new();
                encode_value(&mut tmp, item, depth + 1, config)?;
                encoded.push(tmp);
            }
            encoded.sort_unstable();
            // Distinct values can share an encoding once comments are
            // stripped, so dedup on the wire form rather than trusting the
            // in-memory set.
            encoded.dedup();
            put_uvarint(buf, encoded.len() as u64);
            for enc in encoded {
                buf.extend_from_slice(&enc);
            }
        }
        Value::Map(entries) => {
            buf.push(Tag::Map.into());
            let mut encoded: Vec<(Vec<u8>, Vec<u8>)> = Vec::with_capacity(entries.len());
            for (key, val) in entries {
                let mut kb = Vec::new();
                encode_value(&mut kb, key, depth + 1, config)?;
                let mut vb = Vec::new();
                encode_value(&mut vb, val, depth + 1, config)?;
                encoded.push((kb, vb));
            }
            encoded.sort_unstable_by(|a, b| a.0.cmp(&b.0));
            if encoded.windows(2).any(|w| w[0].0 == w[1].0) {
                return Err(Error::DuplicateMapKey);
            }
            put_uvarint(buf, encoded.len() as u64);
            for (kb, vb) in encoded {
                buf.extend_from_slice(&kb);
                buf.extend_from_slice(&vb);
            }
        }
        Value::Env(env) => {
            buf.push(Tag::Env.into());
            let meta = Value::Obj(env.meta.to_obj());
            encode_value(buf, &meta, depth + 1, config)?;
            encode_value(buf, &env.body, depth + 1, config)?;
        }
    }
    Ok(())
}
