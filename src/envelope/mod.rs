// In: src/envelope/mod.rs

//! Defines the self-describing outer container of the wire format.
//! This module is the single source of truth for envelope serialization,
//! deserialization, and metadata inspection.
//!
//! The envelope is a MessagePack map with the top-level keys `version`,
//! `encoder`, and `dataBlocks`. Key names and nesting are a compatibility
//! contract with every other producer and consumer of the format; the structs
//! below must keep serializing to exactly that shape.

use crate::column_pipeline::EncodedData;
use crate::error::VolwireError;
use serde::{Deserialize, Serialize};

//==================================================================================
// Format Constants
//==================================================================================

/// The wire format version written into every produced envelope.
pub const WIRE_FORMAT_VERSION: &str = "0.3.0";

/// The oldest wire version this build accepts on read (major, minor, patch).
const MIN_SUPPORTED_VERSION: (u32, u32, u32) = (0, 3, 0);

//==================================================================================
// Public Structs
//==================================================================================

/// One encoded column: the value data plus an optional presence mask.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedColumn {
    pub name: String,
    pub data: EncodedData,
    #[serde(default)]
    pub mask: Option<EncodedData>,
}

/// One encoded table: a named, row-counted, ordered set of columns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedCategory {
    pub name: String,
    #[serde(rename = "rowCount")]
    pub row_count: u32,
    pub columns: Vec<EncodedColumn>,
}

/// A named collection of categories.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedDataBlock {
    pub header: String,
    pub categories: Vec<EncodedCategory>,
}

/// The complete envelope.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedFile {
    pub version: String,
    pub encoder: String,
    #[serde(rename = "dataBlocks")]
    pub data_blocks: Vec<EncodedDataBlock>,
}

//==================================================================================
// Core Implementation
//==================================================================================

impl EncodedFile {
    /// Serializes the envelope into its canonical byte form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, VolwireError> {
        // Named serialization keeps struct fields as map keys; the compact
        // positional form would break every foreign consumer.
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Deserializes an envelope and applies the version gate.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VolwireError> {
        let file: Self = rmp_serde::from_slice(bytes)?;
        file.check_version()?;
        Ok(file)
    }

    /// Rejects envelopes from an incompatible wire format generation.
    pub fn check_version(&self) -> Result<(), VolwireError> {
        let (major, minor, patch) = parse_version(&self.version)?;
        let (min_major, min_minor, min_patch) = MIN_SUPPORTED_VERSION;
        if major != min_major || (minor, patch) < (min_minor, min_patch) {
            return Err(VolwireError::UnsupportedVersion(format!(
                "Envelope version {} is outside the supported range (>= {}.{}.{}, same major)",
                self.version, min_major, min_minor, min_patch
            )));
        }
        Ok(())
    }

    /// Produces a JSON summary of the envelope for logging and inspection,
    /// without decoding any column payloads.
    pub fn describe(&self) -> Result<String, VolwireError> {
        let blocks: Vec<serde_json::Value> = self
            .data_blocks
            .iter()
            .map(|block| {
                serde_json::json!({
                    "header": block.header,
                    "categories": block.categories.iter().map(|category| {
                        serde_json::json!({
                            "name": category.name,
                            "rowCount": category.row_count,
                            "columns": category.columns.iter().map(|column| {
                                serde_json::json!({
                                    "name": column.name,
                                    "encoding": column.data.encoding.iter()
                                        .map(|step| step.kind_name())
                                        .collect::<Vec<_>>(),
                                    "dataBytes": column.data.data.len(),
                                    "masked": column.mask.is_some(),
                                })
                            }).collect::<Vec<_>>(),
                        })
                    }).collect::<Vec<_>>(),
                })
            })
            .collect();

        let summary = serde_json::json!({
            "version": self.version,
            "encoder": self.encoder,
            "dataBlocks": blocks,
        });
        Ok(serde_json::to_string_pretty(&summary)?)
    }
}

fn parse_version(version: &str) -> Result<(u32, u32, u32), VolwireError> {
    let mut parts = version.split('.');
    let mut next = |label: &str| {
        parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| {
                VolwireError::UnsupportedVersion(format!(
                    "Envelope version '{}' has no numeric {} component",
                    version, label
                ))
            })
    };
    let major = next("major")?;
    let minor = next("minor")?;
    let patch = next("patch")?;
    Ok((major, minor, patch))
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_pipeline::{EncodedData, EncodingStep};
    use crate::types::DataType;

    fn create_test_file() -> EncodedFile {
        let column = EncodedColumn {
            name: "id".to_string(),
            data: EncodedData {
                encoding: vec![EncodingStep::ByteArray {
                    array_type: DataType::Int32,
                }],
                data: vec![1, 0, 0, 0, 2, 0, 0, 0],
            },
            mask: None,
        };
        EncodedFile {
            version: WIRE_FORMAT_VERSION.to_string(),
            encoder: "volwire-core test".to_string(),
            data_blocks: vec![EncodedDataBlock {
                header: "SERVER".to_string(),
                categories: vec![EncodedCategory {
                    name: "volume_data".to_string(),
                    row_count: 2,
                    columns: vec![column],
                }],
            }],
        }
    }

    #[test]
    fn test_envelope_roundtrip() {
        let original = create_test_file();
        let bytes = original.to_bytes().unwrap();
        let reconstructed = EncodedFile::from_bytes(&bytes).unwrap();
        assert_eq!(original, reconstructed);
    }

    #[test]
    fn test_envelope_rejects_older_version() {
        let mut file = create_test_file();
        file.version = "0.2.9".to_string();
        let bytes = file.to_bytes().unwrap();
        assert!(matches!(
            EncodedFile::from_bytes(&bytes),
            Err(VolwireError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_envelope_rejects_different_major() {
        let mut file = create_test_file();
        file.version = "1.0.0".to_string();
        assert!(matches!(
            file.check_version(),
            Err(VolwireError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_envelope_accepts_newer_minor() {
        let mut file = create_test_file();
        file.version = "0.4.1".to_string();
        assert!(file.check_version().is_ok());
    }

    #[test]
    fn test_envelope_rejects_garbage_version() {
        let mut file = create_test_file();
        file.version = "three point one".to_string();
        assert!(matches!(
            file.check_version(),
            Err(VolwireError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_garbage_bytes_are_an_envelope_error() {
        let result = EncodedFile::from_bytes(b"not an envelope");
        assert!(matches!(result, Err(VolwireError::EnvelopeDecode(_))));
    }

    #[test]
    fn test_describe_lists_blocks_and_encodings() {
        let file = create_test_file();
        let summary = file.describe().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(parsed["encoder"], "volwire-core test");
        let column = &parsed["dataBlocks"][0]["categories"][0]["columns"][0];
        assert_eq!(column["name"], "id");
        assert_eq!(column["encoding"][0], "ByteArray");
        assert_eq!(column["dataBytes"], 8);
        assert_eq!(column["masked"], false);
    }
}
