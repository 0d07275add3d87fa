//! Common types used throughout the client
//!
//! Shared type definitions, type aliases and wire constants used across
//! multiple modules.

use crate::decode::fields::null_default;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Platform Constants
// ============================================================================

/// Domain every tenant subdomain hangs off
pub const DEFAULT_DOMAIN: &str = "memberclicks.net";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Flavor
// ============================================================================

/// Which API generation a client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    /// OAuth2-protected JSON API (`/api/v1/...`)
    #[default]
    Current,
    /// Legacy token-header API (`/services/...`)
    Classic,
}

// ============================================================================
// Error Response
// ============================================================================

/// Structured failure payload returned by the platform
///
/// Every field tolerates an explicit `null`, which decodes as its zero value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorResponse {
    /// Seconds since the epoch
    #[serde(deserialize_with = "null_default")]
    pub timestamp: i64,
    #[serde(deserialize_with = "null_default")]
    pub status: u16,
    /// Short error code, e.g. "Unauthorized"
    #[serde(deserialize_with = "null_default")]
    pub error: String,
    #[serde(deserialize_with = "null_default")]
    pub message: String,
    #[serde(deserialize_with = "null_default")]
    pub message_details: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub path: String,
    #[serde(deserialize_with = "null_default")]
    pub parameters: HashMap<String, String>,
}

impl ErrorResponse {
    /// When the server produced the error
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp, 0).single()
    }
}
