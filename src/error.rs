//! Error types for the MemberClicks client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use crate::pagination::ProfilePage;
use crate::types::ErrorResponse;
use thiserror::Error;

/// The main error type for the MemberClicks client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header value for '{name}'")]
    InvalidHeader { name: String },

    // ============================================================================
    // Upstream Errors
    // ============================================================================
    /// Any response with status >= 400. Displays as the upstream message only.
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        response: Option<Box<ErrorResponse>>,
    },

    #[error("HTTP response has no content length")]
    NoContent,

    // ============================================================================
    // Decode Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("XML parsing error: {message}")]
    XmlParse { message: String },

    #[error("XML encoding error: {message}")]
    XmlEncode { message: String },

    // ============================================================================
    // Attribute Errors
    // ============================================================================
    #[error("map is empty")]
    EmptyRecord,

    #[error("no such field: {name}")]
    NoSuchField { name: String },

    #[error("cannot assign attribute '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("aggregation stopped after {} profiles: {source}", .partial.profiles.len())]
    PartialAggregation {
        partial: Box<ProfilePage>,
        source: Box<Error>,
    },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an upstream error without a structured body
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
            response: None,
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a no-such-field error
    pub fn no_such_field(name: impl Into<String>) -> Self {
        Self::NoSuchField { name: name.into() }
    }

    /// HTTP status of an upstream error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            Error::PartialAggregation { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether the server rejected our credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Whether this came from reading or writing a profile attribute
    pub fn is_attribute_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyRecord | Error::NoSuchField { .. } | Error::TypeMismatch { .. }
        )
    }

    /// Profiles collected before an aggregation failed
    pub fn partial_profiles(&self) -> Option<&ProfilePage> {
        match self {
            Error::PartialAggregation { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Result type alias for the MemberClicks client
pub type Result<T> = std::result::Result<T, Error>;
