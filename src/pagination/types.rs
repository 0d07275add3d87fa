//! Pagination types and traits
//!
//! The profile list envelope, the saved-search handle and the abstraction
//! the aggregation loop pulls pages through.

use crate::decode::fields::null_default;
use crate::error::Result;
use crate::profile::Profile;
use crate::types::JsonObject;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Smallest page size the server accepts
pub const MIN_PAGE_SIZE: u32 = 10;

/// Largest page size the server accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// How long a saved search stays valid after it is created
pub const SEARCH_TTL_MINUTES: i64 = 30;

/// Clamp a requested page size into `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`
pub fn clamp_page_size(size: i64) -> u32 {
    if size < i64::from(MIN_PAGE_SIZE) {
        MIN_PAGE_SIZE
    } else if size > i64::from(MAX_PAGE_SIZE) {
        MAX_PAGE_SIZE
    } else {
        size as u32
    }
}

/// One page of `/api/v1/profile`, or the union of all pages after aggregation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePage {
    #[serde(deserialize_with = "null_default")]
    pub total_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub total_page_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub page_number: i64,
    #[serde(deserialize_with = "null_default")]
    pub page_size: i64,
    #[serde(deserialize_with = "null_default")]
    pub count: i64,
    #[serde(deserialize_with = "null_default")]
    pub first_page_url: String,
    #[serde(deserialize_with = "null_default")]
    pub next_page_url: String,
    #[serde(deserialize_with = "null_default")]
    pub last_page_url: String,
    #[serde(deserialize_with = "null_default")]
    pub profiles: Vec<Profile>,
}

impl ProfilePage {
    /// Number of pages the server reported, treating negatives as none
    pub fn page_total(&self) -> u32 {
        u32::try_from(self.total_page_count).unwrap_or(0)
    }

    /// Append the profiles of a later page
    pub fn absorb(&mut self, page: ProfilePage) {
        self.profiles.extend(page.profiles);
        self.count = self.profiles.len() as i64;
    }

    /// Rewrite metadata so the page describes everything it now holds
    pub fn seal(&mut self) {
        let total = self.profiles.len() as i64;
        self.total_page_count = 1;
        self.total_count = total;
        self.count = total;
        self.next_page_url.clear();
        self.last_page_url.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// A server-side saved search, returned by `/api/v1/profile/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchHandle {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub expire_date: String,
    #[serde(deserialize_with = "null_default")]
    pub status: i64,
    /// Creation time, epoch seconds
    #[serde(deserialize_with = "null_default")]
    pub timestamp: i64,
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    /// Criteria echoed back by the server
    #[serde(deserialize_with = "null_default")]
    pub item: JsonObject,
    #[serde(deserialize_with = "null_default")]
    pub profiles_url: String,
}

impl SearchHandle {
    /// Estimated expiry: creation time plus the search lifetime
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp <= 0 {
            return None;
        }
        let created = Utc.timestamp_opt(self.timestamp, 0).single()?;
        Some(created + Duration::minutes(SEARCH_TTL_MINUTES))
    }

    /// Whether the handle is past its expiry at `now`.
    ///
    /// A handle without a timestamp is never reported as expired; the
    /// server's answer is authoritative.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| now >= at)
    }
}

/// What a list call should fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// A single page with a clamped size
    Page { number: u32, size: u32 },
    /// Every page, merged
    All,
}

impl PageRequest {
    /// Interpret caller arguments: a page below 1 means all pages
    pub fn from_args(page: i64, page_size: i64) -> Self {
        if page < 1 {
            Self::All
        } else {
            Self::Page {
                number: u32::try_from(page).unwrap_or(u32::MAX),
                size: clamp_page_size(page_size),
            }
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Anything that can fetch a numbered page of profiles
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch page `page` (1-based) with `page_size` items
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<ProfilePage>;
}
