//! Classic user records
//!
//! The classic API returns users as a fixed element tree with a repeated
//! `attribute` list instead of an open attribute map.

use crate::decode::fields::{flexible_bool, flexible_i32};
use crate::profile::ProfileRecord;
use chrono::{DateTime, FixedOffset};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// `/services/user` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserList {
    #[serde(rename = "user", default)]
    pub users: Vec<ClassicProfile>,
}

/// A classic user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassicProfile {
    pub user_id: String,
    pub group_id: String,
    pub contact_name: String,
    #[serde(deserialize_with = "flexible_bool")]
    pub active: bool,
    #[serde(deserialize_with = "flexible_bool")]
    pub validated: bool,
    #[serde(deserialize_with = "flexible_bool")]
    pub deleted: bool,
    #[serde(rename = "attribute")]
    pub attributes: Vec<Attribute>,
}

impl ClassicProfile {
    /// Data of the first attribute named `name`, ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attribute(name).map(|a| a.att_data.as_str())
    }

    /// First attribute named `name`, ignoring case
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.att_name.eq_ignore_ascii_case(name))
    }
}

impl ProfileRecord for ClassicProfile {
    fn id(&self) -> i64 {
        self.user_id.trim().parse().unwrap_or(0)
    }

    fn field_text(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    fn entity_kind(&self) -> &'static str {
        "user"
    }
}

/// One attribute of a classic user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attribute {
    pub user_id: String,
    pub att_id: String,
    pub att_type_id: AttributeType,
    pub att_name: String,
    pub att_data: String,
    #[serde(alias = "lastModifiy", deserialize_with = "optional_timestamp")]
    pub last_modify: Option<DateTime<FixedOffset>>,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.att_data)
    }
}

/// RFC 3339 timestamp; empty or missing text means no timestamp
fn optional_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => DateTime::parse_from_rfc3339(text.trim())
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}

/// Classic attribute type code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AttributeType(pub i32);

impl AttributeType {
    /// Human-readable name of the type
    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "E-mail Address (Contact Center)",
            2 => "First Name",
            3 => "Last Name",
            4 => "Picture",
            5 => "Number",
            6 => "Fax Number (Contact Center)",
            7 => "Plain Text",
            8 => "User Group",
            9 => "Selection Set",
            10 => "Login Name",
            11 => "Password",
            12 => "Notes",
            13 => "E-mail Address",
            14 => "Fax Number",
            15 => "Web Page",
            16 => "Contact Center Greeting",
            19 => "Date",
            20 => "Date & Time",
            21 => "Numeric",
            24 => "Expiration Date",
            25 => "Hidden Email Address",
            26 => "Hidden Email Address (Contact Center)",
            27 => "Attachment",
            28 => "Address Line 1",
            29 => "Address Line 2",
            30 => "City",
            31 => "State",
            32 => "Zipcode",
            33 => "Country",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for AttributeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for AttributeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        flexible_i32(deserializer).map(Self)
    }
}
