//! Decoder implementations
//!
//! Each decoder handles a specific response format.

use super::types::{DecoderFormat, PayloadDecoder};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadDecoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })
    }
}

// ============================================================================
// XML Decoder
// ============================================================================

/// XML decoder backed by quick-xml's serde support
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl XmlDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadDecoder for XmlDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        let body = body.trim();
        if !body.starts_with('<') {
            return Err(Error::XmlParse {
                message: "Input does not appear to be XML".to_string(),
            });
        }
        quick_xml::de::from_str(body).map_err(|e| Error::XmlParse {
            message: e.to_string(),
        })
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Decode `body` with the decoder matching `format`
pub fn decode_as<T: DeserializeOwned>(format: DecoderFormat, body: &str) -> Result<T> {
    match format {
        DecoderFormat::Json => JsonDecoder.decode(body),
        DecoderFormat::Xml => XmlDecoder.decode(body),
    }
}

/// Encode a value as an XML document rooted at `root`
pub fn encode_xml<T: Serialize>(root: &str, value: &T) -> Result<String> {
    let mut out = String::new();
    let serializer = quick_xml::se::Serializer::with_root(&mut out, Some(root)).map_err(|e| {
        Error::XmlEncode {
            message: e.to_string(),
        }
    })?;
    value.serialize(serializer).map_err(|e| Error::XmlEncode {
        message: e.to_string(),
    })?;
    Ok(out)
}
