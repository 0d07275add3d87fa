//! Dynamic profile record
//!
//! A profile's fields are defined by the tenant's configuration, so the
//! record is a lazily-allocated [`AttrMap`] with typed accessors on top.

use super::value::{AttrMap, AttrValue, FromAttr};
use crate::error::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity attribute of a profile
pub const PROFILE_ID: &str = "[Profile ID]";

/// Member type attribute
pub const MEMBER_TYPE: &str = "[Member Type]";

/// Group membership attribute (a list of group names)
pub const GROUP: &str = "[Group]";

/// Lookup contract shared by the dynamic and classic profile shapes
pub trait ProfileRecord {
    /// 64-bit identity, 0 when absent or not derivable
    fn id(&self) -> i64;

    /// A field rendered as text, if present
    fn field_text(&self, name: &str) -> Option<String>;

    /// Identity as a string key
    fn entity_id(&self) -> String {
        self.id().to_string()
    }

    /// Entity kind used as a storage namespace
    fn entity_kind(&self) -> &'static str {
        "profile"
    }
}

/// One named value of an ordered property list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: AttrValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A MemberClicks profile backed by an open-ended attribute map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    attributes: Option<AttrMap>,
}

impl Profile {
    /// Create an empty profile with no storage allocated
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing attribute map
    pub fn from_attributes(attributes: AttrMap) -> Self {
        Self {
            attributes: Some(attributes),
        }
    }

    /// Identity of the profile.
    ///
    /// Strings, 64-bit integers and floats all derive the same value. A
    /// 32-bit integer is not accepted and yields 0.
    pub fn id(&self) -> i64 {
        let Some(value) = self.attributes.as_ref().and_then(|m| m.get(PROFILE_ID)) else {
            return 0;
        };
        match value {
            AttrValue::String(s) => s.parse().unwrap_or(0),
            AttrValue::Int(i) => *i,
            AttrValue::Float(f) => *f as i64,
            _ => 0,
        }
    }

    /// Names of the groups the profile belongs to
    pub fn groups(&self) -> Vec<String> {
        match self.get::<Vec<AttrValue>>(GROUP) {
            Ok(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Member type, empty when unset or not a string
    pub fn member_type(&self) -> String {
        self.get::<String>(MEMBER_TYPE).unwrap_or_default()
    }

    /// Raw attribute map, `None` until something has been written or loaded
    pub fn attributes(&self) -> Option<&AttrMap> {
        self.attributes.as_ref()
    }

    /// Consume the profile, returning its attributes
    pub fn into_attributes(self) -> AttrMap {
        self.attributes.unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.attributes.as_ref().map_or(0, AttrMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the raw value of an attribute
    pub fn value(&self, name: &str) -> Result<&AttrValue> {
        let attributes = self.attributes.as_ref().ok_or(Error::EmptyRecord)?;
        attributes
            .get(name)
            .ok_or_else(|| Error::no_such_field(name))
    }

    /// Read an attribute into a typed destination.
    ///
    /// Fails with [`Error::EmptyRecord`] before anything was written,
    /// [`Error::NoSuchField`] for an unknown name and
    /// [`Error::TypeMismatch`] when the stored shape differs from `T`.
    pub fn get<T: FromAttr>(&self, name: &str) -> Result<T> {
        let value = self.value(name)?;
        T::from_attr(value).ok_or_else(|| Error::TypeMismatch {
            name: name.to_string(),
            expected: T::EXPECTED,
            found: value.kind(),
        })
    }

    /// Set an attribute, allocating storage on first write
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes
            .get_or_insert_with(AttrMap::new)
            .insert(name.into(), value.into());
    }

    /// Remove the named attributes; unknown names are ignored
    pub fn delete<S: AsRef<str>>(&mut self, names: &[S]) {
        if let Some(attributes) = self.attributes.as_mut() {
            for name in names {
                attributes.remove(name.as_ref());
            }
        }
    }

    /// Merge an ordered property list into the profile.
    ///
    /// Later properties overwrite earlier ones of the same name.
    pub fn load<I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = Property>,
    {
        let attributes = self.attributes.get_or_insert_with(AttrMap::new);
        for property in properties {
            attributes.insert(property.name, property.value);
        }
    }

    /// Export the profile as a property list in name order
    pub fn save(&self) -> Vec<Property> {
        self.attributes
            .iter()
            .flatten()
            .map(|(name, value)| Property {
                name: name.clone(),
                value: value.clone(),
            })
            .collect()
    }
}

impl ProfileRecord for Profile {
    fn id(&self) -> i64 {
        Profile::id(self)
    }

    fn field_text(&self, name: &str) -> Option<String> {
        match self.value(name).ok()? {
            AttrValue::String(s) => Some(s.clone()),
            AttrValue::Int(i) => Some(i.to_string()),
            AttrValue::Int32(i) => Some(i.to_string()),
            AttrValue::Float(f) => Some(f.to_string()),
            AttrValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl FromIterator<Property> for Profile {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        let mut profile = Profile::new();
        profile.load(iter);
        profile
    }
}

impl Serialize for Profile {
    /// Encodes the attribute map as a JSON object. A floating point identity
    /// is written as an integer.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let empty = AttrMap::new();
        let attributes = self.attributes.as_ref().unwrap_or(&empty);
        let mut map = serializer.serialize_map(Some(attributes.len()))?;
        for (name, value) in attributes {
            match value {
                AttrValue::Float(f) if name == PROFILE_ID => {
                    map.serialize_entry(name, &(*f as i64))?;
                }
                _ => map.serialize_entry(name, value)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let attributes = Option::<AttrMap>::deserialize(deserializer)?;
        Ok(Self { attributes })
    }
}
