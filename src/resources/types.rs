//! Resource types
//!
//! One item type and one list envelope per endpoint. Every envelope is
//! `{totalCount, <items>: [...]}`. Missing or null values, the item list
//! included, decode as their zero value.

use crate::decode::fields::null_default;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An un-paginated list endpoint and its envelope
pub trait ResourceList: DeserializeOwned + Send {
    /// Item type carried by the envelope
    type Item;

    /// Endpoint path
    const PATH: &'static str;

    /// Items in server order
    fn into_items(self) -> Vec<Self::Item>;
}

macro_rules! resource_list {
    ($list:ident, $item:ty, $field:ident, $json:tt, $path:tt) => {
        #[doc = concat!("Envelope returned by `", $path, "`")]
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $list {
            #[serde(deserialize_with = "null_default")]
            pub total_count: i64,
            #[serde(rename = $json, deserialize_with = "null_default")]
            pub $field: Vec<$item>,
        }

        impl ResourceList for $list {
            type Item = $item;
            const PATH: &'static str = $path;

            fn into_items(self) -> Vec<$item> {
                self.$field
            }
        }
    };
}

/// An event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub date: String,
}

/// A group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
}

/// A country
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Country {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A member type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberType {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
}

/// A member status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberStatus {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
}

resource_list!(EventList, Event, events, "events", "/api/v1/event");
resource_list!(GroupList, Group, groups, "groups", "/api/v1/group");
resource_list!(CountryList, Country, countries, "countries", "/api/v1/country");
resource_list!(
    MemberTypeList,
    MemberType,
    member_types,
    "memberTypes",
    "/api/v1/member-type"
);
resource_list!(
    MemberStatusList,
    MemberStatus,
    member_statuses,
    "memberStatuses",
    "/api/v1/member-status"
);
