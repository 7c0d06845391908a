//! JSON compatibility layer.
//!
//! Maps between JSON documents and the value model. Typed scalars travel as
//! tagged objects (`{"@type":"int","value":"2"}` and friends), keyed maps as
//! arrays of `{key,value}` pairs so non-string keys survive, and envelopes
//! as `{"$meta":…,"$body":…}` at the top level. Untyped JSON numbers are
//! coerced into precise typed values: integers become `Int`, everything
//! else becomes `Dec` through its shortest decimal string — binary floats
//! are never re-parsed.

use std::collections::{BTreeMap, BTreeSet};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Map as JsonMap, Value as Json};
use uuid::Uuid;

use crate::comments::strip_json_comments;
use crate::config::CodecConfig;
use crate::envelope::{Envelope, Meta};
use crate::error::{Error, Result};
use crate::timestamp::{Date, Time, Timestamp};
use crate::value::{Value, COMMENT_KEY};

/// Serialize a value to JSON bytes with the default configuration. The
/// pretty flag selects two-space indentation.
pub fn marshal_json(value: &Value, pretty: bool) -> Vec<u8> {
    marshal_json_with(value, pretty, &CodecConfig::default())
}

/// Serialize a value to JSON bytes.
pub fn marshal_json_with(value: &Value, pretty: bool, config: &CodecConfig) -> Vec<u8> {
    let json = to_json_value_with(value, config);
    if pretty {
        serde_json::to_vec_pretty(&json).expect("JSON tree serialization cannot fail")
    } else {
        serde_json::to_vec(&json).expect("JSON tree serialization cannot fail")
    }
}

/// Parse JSON bytes that may contain `//` and `/* */` comments into a
/// value, using the default configuration.
pub fn from_json_bytes(bytes: &[u8]) -> Result<Value> {
    from_json_bytes_with(bytes, &CodecConfig::default())
}

/// Parse comment-tolerant JSON bytes into a value.
pub fn from_json_bytes_with(bytes: &[u8], config: &CodecConfig) -> Result<Value> {
    let clean = strip_json_comments(bytes);
    let json: Json =
        serde_json::from_slice(&clean).map_err(|e| Error::BadJson(e.to_string()))?;
    from_json_value_with(&json, config)
}

/// Rewrite a parsed JSON tree into a value with the default configuration.
pub fn from_json_value(json: &Json) -> Result<Value> {
    from_json_value_with(json, &CodecConfig::default())
}

/// Rewrite a parsed JSON tree into a value.
pub fn from_json_value_with(json: &Json, config: &CodecConfig) -> Result<Value> {
    convert_json(json, config, true)
}

fn convert_json(json: &Json, config: &CodecConfig, top_level: bool) -> Result<Value> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::String(s) => Value::Str(s.clone()),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if n.as_u64().is_some() {
                // Beyond i64: promote to Dec rather than truncate.
                Value::Dec(
                    n.to_string()
                        .parse()
                        .map_err(|_| Error::BadJson(format!("bad number {}", n)))?,
                )
            } else {
                let f = n
                    .as_f64()
                    .ok_or_else(|| Error::BadJson(format!("bad number {}", n)))?;
                Value::from_f64(f)?
            }
        }
        Json::Array(items) => Value::Arr(
            items
                .iter()
                .map(|item| convert_json(item, config, false))
                .collect::<Result<_>>()?,
        ),
        Json::Object(map) => {
            if top_level && map.len() == 2 && map.contains_key("$meta") && map.contains_key("$body")
            {
                return convert_envelope(map, config);
            }
            if map.len() == 2 {
                if let Some(Json::String(type_name)) = map.get("@type") {
                    if let Some(v) = convert_tagged(type_name, map, config)? {
                        return Ok(v);
                    }
                }
            }
            let mut obj = BTreeMap::new();
            for (key, val) in map {
                if key == COMMENT_KEY && !config.preserve_comments {
                    continue;
                }
                obj.insert(key.clone(), convert_json(val, config, false)?);
            }
            Value::Obj(obj)
        }
    })
}

fn convert_envelope(map: &JsonMap<String, Json>, config: &CodecConfig) -> Result<Value> {
    let meta = match convert_json(&map["$meta"], config, false)? {
        Value::Obj(obj) => Meta::from_obj(obj)?,
        _ => return Err(Error::InvalidEnvelope),
    };
    let body = convert_json(&map["$body"], config, false)?;
    Ok(Value::Env(Box::new(Envelope { meta, body })))
}

fn tag_field<'a>(
    map: &'a JsonMap<String, Json>,
    type_name: &str,
    key: &str,
) -> Result<&'a Json> {
    map.get(key)
        .ok_or_else(|| Error::BadJson(format!("@type {:?} missing {:?}", type_name, key)))
}

fn tag_text<'a>(
    map: &'a JsonMap<String, Json>,
    type_name: &str,
    key: &str,
) -> Result<&'a str> {
    tag_field(map, type_name, key)?.as_str().ok_or_else(|| {
        Error::BadJson(format!(
            "@type {:?} field {:?} must be a string",
            type_name, key
        ))
    })
}

/// Convert a recognized tagged-scalar object. Returns `Ok(None)` when the
/// `@type` name is unknown, in which case the object passes through as a
/// plain `Obj`; a known name with a malformed payload is an error.
fn convert_tagged(
    type_name: &str,
    map: &JsonMap<String, Json>,
    config: &CodecConfig,
) -> Result<Option<Value>> {
    let text = |key: &str| tag_text(map, type_name, key);
    Ok(Some(match type_name {
        "int" => Value::Int(
            text("value")?
                .parse()
                .map_err(|e| Error::BadJson(format!("{}", e)))?,
        ),
        "dec" => Value::Dec(
            text("value")?
                .parse()
                .map_err(|e| Error::BadJson(format!("{}", e)))?,
        ),
        "ts" => Value::Ts(Timestamp::new(text("value")?)?),
        "date" => Value::Date(Date::new(text("value")?)?),
        "time" => Value::Time(Time::new(text("value")?)?),
        "uuid" => {
            let literal = text("value")?;
            Value::Uuid(
                Uuid::parse_str(literal)
                    .map_err(|_| Error::InvalidUuid(literal.to_string()))?,
            )
        }
        "bin" => Value::Bin(
            BASE64
                .decode(text("value")?)
                .map_err(|e| Error::BadJson(format!("bad base64: {}", e)))?,
        ),
        "link" => Value::Link(text("ref")?.to_string()),
        "annot" => Value::Annot(text("note")?.to_string()),
        "set" => {
            let items = tag_field(map, type_name, "value")?
                .as_array()
                .ok_or_else(|| Error::BadJson("@type \"set\" value must be an array".into()))?;
            let mut set = BTreeSet::new();
            for item in items {
                set.insert(convert_json(item, config, false)?);
            }
            Value::Set(set)
        }
        "map" => {
            let items = tag_field(map, type_name, "value")?
                .as_array()
                .ok_or_else(|| Error::BadJson("@type \"map\" value must be an array".into()))?;
            let mut entries = BTreeMap::new();
            for item in items {
                let pair = item.as_object().filter(|p| {
                    p.len() == 2 && p.contains_key("key") && p.contains_key("value")
                });
                let pair = pair.ok_or_else(|| {
                    Error::BadJson("map entries must be {key, value} objects".into())
                })?;
                let key = convert_json(&pair["key"], config, false)?;
                let val = convert_json(&pair["value"], config, false)?;
                if entries.insert(key, val).is_some() {
                    return Err(Error::DuplicateMapKey);
                }
            }
            Value::Map(entries)
        }
        _ => return Ok(None),
    }))
}

/// Lower a value into a JSON tree with the default configuration.
pub fn to_json_value(value: &Value) -> Json {
    to_json_value_with(value, &CodecConfig::default())
}

/// Lower a value into a JSON tree.
pub fn to_json_value_with(value: &Value, config: &CodecConfig) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => json!(b),
        Value::Str(s) => json!(s),
        Value::Int(i) => json!({"@type": "int", "value": i.to_string()}),
        Value::Dec(d) => json!({"@type": "dec", "value": d.to_string()}),
        Value::Bin(b) => json!({"@type": "bin", "value": BASE64.encode(b)}),
        Value::Ts(t) => json!({"@type": "ts", "value": t.as_str()}),
        Value::Date(d) => json!({"@type": "date", "value": d.as_str()}),
        Value::Time(t) => json!({"@type": "time", "value": t.as_str()}),
        Value::Uuid(u) => json!({"@type": "uuid", "value": u.hyphenated().to_string()}),
        Value::Link(r) => json!({"@type": "link", "ref": r}),
        Value::Annot(n) => json!({"@type": "annot", "note": n}),
        Value::Arr(items) => Json::Array(
            items
                .iter()
                .map(|item| to_json_value_with(item, config))
                .collect(),
        ),
        Value::Obj(map) => {
            let mut out = JsonMap::new();
            for (key, val) in map {
                if key == COMMENT_KEY && !config.preserve_comments {
                    continue;
                }
                out.insert(key.clone(), to_json_value_with(val, config));
            }
            Json::Object(out)
        }
        Value::Set(items) => {
            let items: Vec<Json> = items
                .iter()
                .map(|item| to_json_value_with(item, config))
                .collect();
            json!({"@type": "set", "value": items})
        }
        Value::Map(entries) => {
            let pairs: Vec<Json> = entries
                .iter()
                .map(|(k, v)| {
                    json!({
                        "key": to_json_value_with(k, config),
                        "value": to_json_value_with(v, config),
                    })
                })
                .collect();
            json!({"@type": "map", "value": pairs})
        }
        Value::Env(env) => {
            let meta = Value::Obj(env.meta.to_obj());
            json!({
                "$meta": to_json_value_with(&meta, config),
                "$body": to_json_value_with(&env.body, config),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{decode, encode};

    #[test]
    fn numbers_coerce_to_typed_values() {
        let v = from_json_bytes(br#"{"a":1,"b":2.5,"c":1e3,"d":18446744073709551615}"#).unwrap();
        let obj = v.as_obj().unwrap();
        assert_eq!(obj["a"], Value::from(1i64));
        match &obj["b"] {
            Value::Dec(d) => assert_eq!(d.to_string(), "2.5"),
            other => panic!("expected Dec, got {:?}", other),
        }
        assert_eq!(obj["c"], Value::from(1000i64));
        match &obj["d"] {
            Value::Dec(d) => assert_eq!(d.to_string(), "18446744073709551615"),
            other => panic!("expected Dec, got {:?}", other),
        }
    }

    #[test]
    fn tagged_scalars_roundtrip_through_binary() {
        let input: &[u8] = br#"{
            "price": { "@type": "dec", "value": "1999.95" },
            "qty": { "@type": "int", "value": "2" }
        }"#;
        let v = from_json_bytes(input).unwrap();
        let back = decode(&encode(&v).unwrap()).unwrap();
        assert_eq!(back, v);

        let json = to_json_value(&back);
        let want: Json = serde_json::from_slice(input).unwrap();
        assert_eq!(json, want);
    }

    #[test]
    fn unknown_type_tag_stays_a_plain_object() {
        let v = from_json_bytes(br#"{"@type":"widget","value":"x"}"#).unwrap();
        let obj = v.as_obj().unwrap();
        assert_eq!(obj["@type"], Value::from("widget"));
    }

    #[test]
    fn known_type_tag_with_bad_payload_is_rejected() {
        assert!(matches!(
            from_json_bytes(br#"{"@type":"int","value":"2.5"}"#),
            Err(Error::BadJson(_))
        ));
        assert!(matches!(
            from_json_bytes(br#"{"@type":"bin","value":"!!!"}"#),
            Err(Error::BadJson(_))
        ));
        assert!(matches!(
            from_json_bytes(br#"{"@type":"uuid","value":"nope"}"#),
            Err(Error::InvalidUuid(literal)) if literal == "nope"
        ));
    }

    #[test]
    fn temporal_tagged_scalars_are_validated() {
        assert!(matches!(
            from_json_bytes(br#"{"@type":"ts","value":"not a timestamp"}"#),
            Err(Error::InvalidTimestamp { kind: "timestamp", .. })
        ));
        assert!(matches!(
            from_json_bytes(br#"{"@type":"date","value":"2025-13-40"}"#),
            Err(Error::InvalidTimestamp { kind: "date", .. })
        ));
        assert!(matches!(
            from_json_bytes(br#"{"@type":"time","value":"99:99:99"}"#),
            Err(Error::InvalidTimestamp { kind: "time", .. })
        ));
    }

    #[test]
    fn set_and_map_tagged_forms() {
        let v = from_json_bytes(
            br#"{"tags":{"@type":"set","value":["gift","festival","gift"]},
                 "prices":{"@type":"map","value":[
                    {"key":{"@type":"int","value":"1"},"value":"one"},
                    {"key":"k","value":null}]}}"#,
        )
        .unwrap();
        let obj = v.as_obj().unwrap();
        assert_eq!(obj["tags"].as_set().unwrap().len(), 2);
        assert_eq!(obj["prices"].as_map().unwrap().len(), 2);

        let json = to_json_value(&v);
        let back = from_json_value(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn duplicate_map_keys_in_json_are_rejected() {
        let err = from_json_bytes(
            br#"{"@type":"map","value":[
                {"key":1,"value":"a"},
                {"key":1,"value":"b"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateMapKey));
    }

    #[test]
    fn envelope_form_is_recognized_at_top_level() {
        let v = from_json_bytes(
            br#"{"$meta":{"type":"urn:jolt:x/Y","version":"1.0.0",
                          "createdAt":{"@type":"ts","value":"2025-08-08T07:42:01.344243000Z"}},
                 "$body":{"n":1}}"#,
        )
        .unwrap();
        let env = v.as_env().unwrap();
        assert_eq!(env.meta.type_.as_deref(), Some("urn:jolt:x/Y"));
        assert_eq!(
            env.meta.created_at.as_ref().unwrap().as_str(),
            "2025-08-08T07:42:01.344243000Z"
        );

        let json = to_json_value(&v);
        assert_eq!(from_json_value(&json).unwrap(), v);
    }

    #[test]
    fn comments_are_tolerated_and_fields_survive() {
        let v = from_json_bytes(
            br#"{
              // leading comment
              "n": { "@type":"int", "value":"2" } /* trailing */
            }"#,
        )
        .unwrap();
        assert_eq!(v.as_obj().unwrap()["n"], Value::from(2i64));
    }

    #[test]
    fn comment_keys_follow_the_config() {
        let input = br#"{"$comment":"note","x":1}"#;
        let stripped = from_json_bytes(input).unwrap();
        assert!(stripped.as_obj().unwrap().get(COMMENT_KEY).is_none());

        let config = CodecConfig::preserving_comments();
        let kept = from_json_bytes_with(input, &config).unwrap();
        assert_eq!(
            kept.as_obj().unwrap()[COMMENT_KEY],
            Value::from("note")
        );

        let json = marshal_json_with(&kept, false, &config);
        assert_eq!(from_json_bytes_with(&json, &config).unwrap(), kept);
        // Default marshal drops the comment again.
        let json = marshal_json(&kept, false);
        assert_eq!(from_json_bytes(&json).unwrap(), stripped);
    }

    #[test]
    fn pretty_uses_two_space_indent() {
        let v = from_json_bytes(br#"{"x":1}"#).unwrap();
        let text = String::from_utf8(marshal_json(&v, true)).unwrap();
        assert!(text.contains("\n  \"x\""));
        let compact = String::from_utf8(marshal_json(&v, false)).unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn json_idempotence_on_a_composite_document() {
        let v = from_json_bytes(
            br#"{"$meta":{"type":"urn:jolt:example/Order","version":"2.1.0"},
                 "$body":{
                   "$id":"order:9f2e",
                   "number":"SO-12988",
                   "qty":{"@type":"int","value":"2"},
                   "price":{"@type":"dec","value":"1999.95"},
                   "uuid":{"@type":"uuid","value":"73bca6bf-8d9d-4095-93f4-13e85485f2db"},
                   "blob":{"@type":"bin","value":"AAEC/w=="},
                   "when":{"@type":"date","value":"2025-08-08"},
                   "at":{"@type":"time","value":"07:42:01"},
                   "tags":{"@type":"set","value":["gift","festival"]},
                   "parent":{"@type":"link","ref":"urn:jolt:doc/1"},
                   "review":{"@type":"annot","note":"checked"}
                 }}"#,
        )
        .unwrap();
        let json = to_json_value(&v);
        assert_eq!(from_json_value(&json).unwrap(), v);
        // And through the binary codec as well.
        assert_eq!(decode(&encode(&v).unwrap()).unwrap(), v);
    }
}
