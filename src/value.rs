//! The in-memory value universe: one variant per wire tag.
//!
//! Values are tree-structured and owned by their parent container; the
//! decoder produces a fresh tree per call. Using a sum type here turns the
//! runtime type dispatch a dynamically-typed implementation needs into
//! exhaustive matches checked at build time.

use std::collections::{BTreeMap, BTreeSet};

use num_traits::FromPrimitive;
use uuid::Uuid;

use crate::decimal::Decimal;
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::integer::Int;
use crate::timestamp::{Date, Time, Timestamp};

/// Objects may carry a human note under this key; it is stripped on both
/// codec paths unless the config retains it.
pub const COMMENT_KEY: &str = "$comment";

/// A JOLT value.
///
/// Containers use ordered collections so that structurally equal values
/// compare equal and iterate deterministically. The wire ordering rules
/// (object keys by UTF-8 bytes, set elements and map entries by encoded
/// bytes) are applied by the encoder.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Str(String),
    Int(Int),
    Dec(Decimal),
    Bin(Vec<u8>),
    Ts(Timestamp),
    Date(Date),
    Time(Time),
    Uuid(Uuid),
    /// A URI-shaped reference to another document.
    Link(String),
    /// A human-readable annotation.
    Annot(String),
    Arr(Vec<Value>),
    Obj(BTreeMap<String, Value>),
    /// Unordered collection, deduplicated and serialized in ascending order
    /// of each element's canonical encoding.
    Set(BTreeSet<Value>),
    /// Mapping with arbitrary value keys, serialized in ascending order of
    /// the encoded key bytes.
    Map(BTreeMap<Value, Value>),
    Env(Box<Envelope>),
}

impl Value {
    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        use self::Value::*;
        match self {
            Null => "null",
            Bool(_) => "bool",
            Str(_) => "str",
            Int(_) => "int",
            Dec(_) => "dec",
            Bin(_) => "bin",
            Ts(_) => "ts",
            Date(_) => "date",
            Time(_) => "time",
            Uuid(_) => "uuid",
            Link(_) => "link",
            Annot(_) => "annot",
            Arr(_) => "arr",
            Obj(_) => "obj",
            Set(_) => "set",
            Map(_) => "map",
            Env(_) => "env",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&Int> {
        match self {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    /// The integer as `i64`, when the value is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(Int::as_i64)
    }

    pub fn as_dec(&self) -> Option<&Decimal> {
        match self {
            Value::Dec(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bin(&self) -> Option<&[u8]> {
        match self {
            Value::Bin(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Arr(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_obj(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Obj(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<Value>> {
        match self {
            Value::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<Value, Value>> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_env(&self) -> Option<&Envelope> {
        match self {
            Value::Env(v) => Some(v),
            _ => None,
        }
    }

    /// Coerce a native float the way the JSON layer does: a value equal to
    /// its truncation is promoted to `Int`, anything else becomes `Dec`
    /// through its shortest decimal string. Non-finite values have no wire
    /// representation.
    pub fn from_f64(x: f64) -> Result<Value> {
        if !x.is_finite() {
            return Err(Error::UnsupportedType("non-finite float"));
        }
        if x.trunc() == x {
            if let Some(n) = num_bigint::BigInt::from_f64(x) {
                return Ok(Value::Int(Int::from(n)));
            }
        }
        let shortest = format!("{}", x);
        Ok(Value::Dec(shortest.parse()?))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(Int::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(Int::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(Int::from(v))
    }
}

impl From<Int> for Value {
    fn from(v: Int) -> Self {
        Value::Int(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Dec(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Ts(v)
    }
}

impl From<Date> for Value {
    fn from(v: Date) -> Self {
        Value::Date(v)
    }
}

impl From<Time> for Value {
    fn from(v: Time) -> Self {
        Value::Time(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bin(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Arr(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Obj(v)
    }
}

impl From<Envelope> for Value {
    fn from(v: Envelope) -> Self {
        Value::Env(Box::new(v))
    }
}

impl FromIterator<Value> for Value {
    /// Collects into an array, the common case for sequence builders.
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Arr(iter.into_iter().collect())
    }
}
