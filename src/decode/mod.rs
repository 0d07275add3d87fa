//! Response decoder module
//!
//! Supports: JSON, XML
//!
//! # Overview
//!
//! Responses are classified by their declared content type. JSON bodies go
//! through serde_json; everything else is handed to the XML decoder, which
//! is what the classic API speaks by default.

pub mod fields;

mod decoders;
mod types;

pub use decoders::{decode_as, encode_xml, JsonDecoder, XmlDecoder};
pub use types::{DecoderFormat, PayloadDecoder};
