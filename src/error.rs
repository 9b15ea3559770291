// In: src/error.rs

//! This module defines the single, unified error type for the entire volwire library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VolwireError {
    // =========================================================================
    // === Codec Contract Violations (Specific to our library's logic)
    // =========================================================================
    #[error("Unsupported data type for this operation: {0}")]
    UnsupportedDataType(String),

    #[error("Unsupported encoding step on decode: {0}")]
    UnsupportedEncoding(String),

    #[error("Malformed encoding chain: {0}")]
    MalformedEncoding(String),

    #[error("Writer called out of sequence: {0}")]
    WriterState(String),

    #[error("Encoder configuration error: {0}")]
    Configuration(String),

    #[error("Out-of-range access while decoding: {0}")]
    Bounds(String),

    #[error("Unsupported wire format version: {0}")]
    UnsupportedVersion(String),

    #[error("Internal logic error (this is a bug): {0}")]
    Internal(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error while serializing the outer MessagePack envelope.
    #[error("Envelope serialization failed: {0}")]
    EnvelopeEncode(#[from] rmp_serde::encode::Error),

    /// An error while deserializing the outer MessagePack envelope.
    #[error("Envelope deserialization failed: {0}")]
    EnvelopeDecode(#[from] rmp_serde::decode::Error),

    /// An error originating from the underlying I/O subsystem (e.g., a closed sink).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, used by the diagnostics surface.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
