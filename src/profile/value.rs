//! Attribute values
//!
//! The closed set of value shapes a profile attribute can hold, plus the
//! typed extraction trait used by [`Profile::get`](super::Profile::get).

use crate::types::JsonValue;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute name → value mapping backing a profile
pub type AttrMap = BTreeMap<String, AttrValue>;

/// A single wire-representable attribute value
///
/// `Int` covers native and 64-bit integers. `Int32` only appears when a
/// caller (usually a property-list loader) hands over a narrow integer; JSON
/// decoding never produces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttrValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Int32(i32),
    Float(f64),
    String(String),
    List(Vec<AttrValue>),
    Map(AttrMap),
}

impl AttrValue {
    /// Human readable name of the variant, used in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Null => "null",
            AttrValue::Bool(_) => "boolean",
            AttrValue::Int(_) => "integer",
            AttrValue::Int32(_) => "int32",
            AttrValue::Float(_) => "float",
            AttrValue::String(_) => "string",
            AttrValue::List(_) => "list",
            AttrValue::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }
}

// ============================================================================
// Conversions into AttrValue
// ============================================================================

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int32(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(value: Vec<AttrValue>) -> Self {
        AttrValue::List(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::List(value.into_iter().map(AttrValue::String).collect())
    }
}

impl From<AttrMap> for AttrValue {
    fn from(value: AttrMap) -> Self {
        AttrValue::Map(value)
    }
}

impl From<JsonValue> for AttrValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => AttrValue::Null,
            JsonValue::Bool(b) => AttrValue::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => AttrValue::Int(i),
                None => AttrValue::Float(n.as_f64().unwrap_or_default()),
            },
            JsonValue::String(s) => AttrValue::String(s),
            JsonValue::Array(items) => {
                AttrValue::List(items.into_iter().map(AttrValue::from).collect())
            }
            JsonValue::Object(map) => AttrValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, AttrValue::from(v)))
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// Typed extraction
// ============================================================================

/// Types that can be read out of an attribute without coercion
///
/// Extraction is strict: an `Int32` value does not satisfy `i64`, and a
/// whole-number `Float` does not satisfy either integer type.
pub trait FromAttr: Sized {
    /// Name reported in type mismatch errors
    const EXPECTED: &'static str;

    fn from_attr(value: &AttrValue) -> Option<Self>;
}

impl FromAttr for AttrValue {
    const EXPECTED: &'static str = "any";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromAttr for String {
    const EXPECTED: &'static str = "string";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromAttr for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromAttr for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromAttr for i32 {
    const EXPECTED: &'static str = "int32";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int32(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromAttr for f64 {
    const EXPECTED: &'static str = "float";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromAttr for Vec<AttrValue> {
    const EXPECTED: &'static str = "list";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::List(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl FromAttr for Vec<String> {
    const EXPECTED: &'static str = "list of strings";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::List(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => None,
        }
    }
}

impl FromAttr for AttrMap {
    const EXPECTED: &'static str = "map";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Map(map) => Some(map.clone()),
            _ => None,
        }
    }
}

// ============================================================================
// Serde
// ============================================================================

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttrValue::Null => serializer.serialize_unit(),
            AttrValue::Bool(b) => serializer.serialize_bool(*b),
            AttrValue::Int(i) => serializer.serialize_i64(*i),
            AttrValue::Int32(i) => serializer.serialize_i32(*i),
            AttrValue::Float(f) => serializer.serialize_f64(*f),
            AttrValue::String(s) => serializer.serialize_str(s),
            AttrValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            AttrValue::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

struct AttrValueVisitor;

impl<'de> Visitor<'de> for AttrValueVisitor {
    type Value = AttrValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean, list or map")
    }

    fn visit_unit<E: de::Error>(self) -> Result<AttrValue, E> {
        Ok(AttrValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<AttrValue, E> {
        Ok(AttrValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<AttrValue, D::Error> {
        AttrValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<AttrValue, E> {
        Ok(AttrValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<AttrValue, E> {
        Ok(AttrValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<AttrValue, E> {
        match i64::try_from(v) {
            Ok(i) => Ok(AttrValue::Int(i)),
            Err(_) => Ok(AttrValue::Float(v as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<AttrValue, E> {
        Ok(AttrValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<AttrValue, E> {
        Ok(AttrValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<AttrValue, E> {
        Ok(AttrValue::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<AttrValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(AttrValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<AttrValue, A::Error> {
        let mut map = AttrMap::new();
        while let Some((k, v)) = access.next_entry::<String, AttrValue>()? {
            map.insert(k, v);
        }
        Ok(AttrValue::Map(map))
    }
}

impl<'de> Deserialize<'de> for AttrValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AttrValueVisitor)
    }
}
