//! Decoder types and traits
//!
//! Defines the payload format classification and the decoder abstraction.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Format of a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// JSON format
    Json,
    /// XML format (default for anything that is not JSON)
    #[default]
    Xml,
}

impl DecoderFormat {
    /// Classify a declared `Content-Type`.
    ///
    /// Only an `application/json` prefix selects JSON; everything else,
    /// including a missing header, is treated as XML.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.trim_start().starts_with("application/json") => Self::Json,
            _ => Self::Xml,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Trait for decoding a response body into a typed destination
pub trait PayloadDecoder: Send + Sync {
    /// Decode the whole body into `T`
    fn decode<T: DeserializeOwned>(&self, body: &str) -> Result<T>;
}
