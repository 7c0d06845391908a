//! Typed, versioned document container.
//!
//! An envelope pairs a metadata block with an arbitrary body under a
//! dedicated wire tag, keeping `$meta`/`$body` structurally distinguishable
//! from ordinary objects.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::timestamp::Timestamp;
use crate::value::Value;

/// Envelope metadata. Every recognized key is optional; keys this library
/// does not recognize are preserved verbatim in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Meta {
    /// Document type identifier, e.g. `urn:jolt:example/Order`.
    pub type_: Option<String>,
    /// Schema reference.
    pub schema: Option<String>,
    /// Document version string.
    pub version: Option<String>,
    /// Feature flags. Empty means absent.
    pub features: Vec<String>,
    /// Creation instant.
    pub created_at: Option<Timestamp>,
    /// Signature slot. Opaque to this library: preserved through both
    /// codecs, with verification left to an outer layer.
    pub sig: Option<Value>,
    /// Unrecognized meta keys, carried through unchanged.
    pub extra: BTreeMap<String, Value>,
}

impl Meta {
    /// Lower the metadata into the object form used on the wire and in
    /// JSON. Recognized fields win over same-named entries in `extra`.
    pub fn to_obj(&self) -> BTreeMap<String, Value> {
        let mut obj = self.extra.clone();
        if let Some(t) = &self.type_ {
            obj.insert("type".to_string(), Value::Str(t.clone()));
        }
        if let Some(s) = &self.schema {
            obj.insert("schema".to_string(), Value::Str(s.clone()));
        }
        if let Some(v) = &self.version {
            obj.insert("version".to_string(), Value::Str(v.clone()));
        }
        if !self.features.is_empty() {
            obj.insert(
                "features".to_string(),
                Value::Arr(self.features.iter().cloned().map(Value::Str).collect()),
            );
        }
        if let Some(ts) = &self.created_at {
            obj.insert("createdAt".to_string(), Value::Ts(ts.clone()));
        }
        if let Some(sig) = &self.sig {
            obj.insert("sig".to_string(), sig.clone());
        }
        obj
    }

    /// Lift an object into metadata, extracting the recognized keys.
    ///
    /// `createdAt` is accepted either as a timestamp value or as a nested
    /// object holding a `value` string (the shape JSON interop produces);
    /// both land in `created_at`, and the nested text form is validated as
    /// RFC3339. A recognized key holding an unexpected shape is not
    /// dropped, it moves to `extra`.
    pub fn from_obj(obj: BTreeMap<String, Value>) -> Result<Meta> {
        let mut meta = Meta::default();
        for (key, value) in obj {
            match (key.as_str(), value) {
                ("type", Value::Str(s)) => meta.type_ = Some(s),
                ("schema", Value::Str(s)) => meta.schema = Some(s),
                ("version", Value::Str(s)) => meta.version = Some(s),
                ("features", Value::Arr(items)) => {
                    meta.features = items
                        .into_iter()
                        .filter_map(|v| match v {
                            Value::Str(s) => Some(s),
                            _ => None,
                        })
                        .collect();
                }
                ("createdAt", Value::Ts(ts)) => meta.created_at = Some(ts),
                ("createdAt", Value::Obj(map)) => {
                    match map.get("value") {
                        Some(Value::Str(s)) => {
                            meta.created_at = Some(Timestamp::new(s.clone())?)
                        }
                        _ => {
                            meta.extra.insert(key.clone(), Value::Obj(map));
                        }
                    }
                }
                ("sig", v) => meta.sig = Some(v),
                (_, v) => {
                    meta.extra.insert(key.clone(), v);
                }
            }
        }
        Ok(meta)
    }
}

/// A metadata block plus an arbitrary body value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Envelope {
    pub meta: Meta,
    pub body: Value,
}

impl Envelope {
    pub fn new(meta: Meta, body: Value) -> Envelope {
        Envelope { meta, body }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn meta_obj_roundtrip() {
        let meta = Meta {
            type_: Some("urn:jolt:x/Y".into()),
            version: Some("1.0.0".into()),
            features: vec!["a".into(), "b".into()],
            created_at: Some(Timestamp::from_literal("2025-08-08T07:42:01.344243000Z")),
            sig: Some(Value::Bin(vec![1, 2, 3])),
            extra: [("tenant".to_string(), Value::from("acme"))].into(),
            ..Meta::default()
        };
        let back = Meta::from_obj(meta.to_obj()).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn created_at_accepts_nested_value_form() {
        let obj: BTreeMap<String, Value> = [(
            "createdAt".to_string(),
            Value::Obj(
                [(
                    "value".to_string(),
                    Value::from("2025-01-01T00:00:00Z"),
                )]
                .into(),
            ),
        )]
        .into();
        let meta = Meta::from_obj(obj).unwrap();
        assert_eq!(
            meta.created_at.unwrap().as_str(),
            "2025-01-01T00:00:00Z"
        );
    }

    #[test]
    fn nested_created_at_is_validated() {
        let obj: BTreeMap<String, Value> = [(
            "createdAt".to_string(),
            Value::Obj([("value".to_string(), Value::from("yesterday"))].into()),
        )]
        .into();
        assert!(matches!(
            Meta::from_obj(obj),
            Err(crate::Error::InvalidTimestamp { kind: "timestamp", .. })
        ));
    }

    #[test]
    fn mistyped_recognized_key_lands_in_extra() {
        let obj: BTreeMap<String, Value> =
            [("version".to_string(), Value::from(2i64))].into();
        let meta = Meta::from_obj(obj).unwrap();
        assert!(meta.version.is_none());
        assert_eq!(meta.extra.get("version"), Some(&Value::from(2i64)));
    }
}
