// In: src/column_pipeline/models.rs

//! The data model of the column codec: the closed set of encoding steps a
//! column can be transformed by, the `EncodedData` pair they produce, and the
//! `ArrayValue` runtime value that flows between chained transforms.
//!
//! `EncodingStep` is the wire-visible part. Its serialized shape (the `kind`
//! discriminant and the camelCase parameter keys) is a compatibility contract
//! with every other producer and consumer of the format and must not change.

use crate::error::VolwireError;
use crate::types::DataType;
use serde::{Deserialize, Serialize};

//==================================================================================
// 1. Encoding Steps (wire model)
//==================================================================================

/// One reversible transform recorded in a column's encoding chain.
///
/// Decoding applies the inverses in reverse chain order. The enum is closed:
/// an envelope carrying a `kind` outside this set parses into `Unrecognized`,
/// which the decode dispatcher rejects with `UnsupportedEncoding`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind")]
pub enum EncodingStep {
    /// Terminal step: typed array serialized as little-endian raw bytes.
    ByteArray {
        #[serde(rename = "type")]
        array_type: DataType,
    },
    /// `round(v * factor)` as Int32. Lossy, error bound `1/(2*factor)`.
    FixedPoint {
        factor: f64,
        #[serde(rename = "srcType")]
        src_type: DataType,
    },
    /// Uniform bucketing of `[min, max]` into `num_steps` levels.
    IntervalQuantization {
        min: f64,
        max: f64,
        #[serde(rename = "numSteps")]
        num_steps: i32,
        #[serde(rename = "srcType")]
        src_type: DataType,
    },
    /// Interleaved `(value, run_length)` Int32 pairs.
    RunLength {
        #[serde(rename = "srcType")]
        src_type: DataType,
        #[serde(rename = "srcSize")]
        src_size: i32,
    },
    /// Difference stream; `origin` holds the first source value.
    Delta {
        origin: i32,
        #[serde(rename = "srcType")]
        src_type: DataType,
    },
    /// Escape-sentinel narrowing of Int32 data to 1- or 2-byte integers.
    IntegerPacking {
        #[serde(rename = "byteCount")]
        byte_count: i32,
        #[serde(rename = "isUnsigned")]
        is_unsigned: bool,
        #[serde(rename = "srcSize")]
        src_size: i32,
    },
    /// Deduplicated string pool with offset table and per-row pool indices.
    StringArray {
        #[serde(rename = "dataEncoding")]
        data_encoding: Vec<EncodingStep>,
        #[serde(rename = "stringData")]
        string_data: String,
        #[serde(rename = "offsetEncoding")]
        offset_encoding: Vec<EncodingStep>,
        #[serde(with = "serde_bytes")]
        offsets: Vec<u8>,
    },
    /// Catch-all for step kinds introduced after this build. Never produced
    /// by the encoders; rejected by the decoders.
    #[serde(other)]
    Unrecognized,
}

impl EncodingStep {
    /// The wire discriminant of this step, for error messages and metrics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::ByteArray { .. } => "ByteArray",
            Self::FixedPoint { .. } => "FixedPoint",
            Self::IntervalQuantization { .. } => "IntervalQuantization",
            Self::RunLength { .. } => "RunLength",
            Self::Delta { .. } => "Delta",
            Self::IntegerPacking { .. } => "IntegerPacking",
            Self::StringArray { .. } => "StringArray",
            Self::Unrecognized => "Unrecognized",
        }
    }
}

/// The encoded form of one array: the ordered transform chain and the raw
/// bytes produced by the final step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedData {
    pub encoding: Vec<EncodingStep>,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

//==================================================================================
// 2. Runtime Array Value
//==================================================================================

/// The value flowing between chained transforms.
///
/// Encoders consume one variant and produce another; a finished chain always
/// ends in `Bytes`. Decoders run the same path in reverse, starting from
/// `Bytes` and ending in a typed variant (or `Str` for string columns).
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Uint8(Vec<u8>),
    Uint16(Vec<u16>),
    Uint32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Str(Vec<String>),
    Bytes(Vec<u8>),
}

impl ArrayValue {
    /// Number of elements (for `Bytes`, the byte count).
    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Uint8(v) => v.len(),
            Self::Uint16(v) => v.len(),
            Self::Uint32(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Str(v) => v.len(),
            Self::Bytes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type tag, if this is a numeric array.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Int8(_) => Some(DataType::Int8),
            Self::Int16(_) => Some(DataType::Int16),
            Self::Int32(_) => Some(DataType::Int32),
            Self::Uint8(_) => Some(DataType::Uint8),
            Self::Uint16(_) => Some(DataType::Uint16),
            Self::Uint32(_) => Some(DataType::Uint32),
            Self::Float32(_) => Some(DataType::Float32),
            Self::Float64(_) => Some(DataType::Float64),
            Self::Str(_) | Self::Bytes(_) => None,
        }
    }

    /// Short label for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self.data_type() {
            Some(dtype) => match dtype {
                DataType::Int8 => "Int8",
                DataType::Int16 => "Int16",
                DataType::Int32 => "Int32",
                DataType::Uint8 => "Uint8",
                DataType::Uint16 => "Uint16",
                DataType::Uint32 => "Uint32",
                DataType::Float32 => "Float32",
                DataType::Float64 => "Float64",
            },
            None => match self {
                Self::Str(_) => "Str",
                _ => "Bytes",
            },
        }
    }

    /// Widens (or, for the wider unsigned/float variants, converts) the array
    /// to an `i32` stream for the integer transforms, returning the source
    /// type tag the matching step should record.
    ///
    /// Non-integer sources come back tagged as `Int32`: the difference and
    /// packing transforms are defined over integer data, and callers that
    /// need lossless float transport quantize first.
    pub fn into_i32_stream(self) -> Result<(Vec<i32>, DataType), VolwireError> {
        match self {
            Self::Int8(v) => Ok((v.into_iter().map(i32::from).collect(), DataType::Int8)),
            Self::Int16(v) => Ok((v.into_iter().map(i32::from).collect(), DataType::Int16)),
            Self::Int32(v) => Ok((v, DataType::Int32)),
            Self::Uint8(v) => Ok((v.into_iter().map(i32::from).collect(), DataType::Uint8)),
            Self::Uint16(v) => Ok((v.into_iter().map(i32::from).collect(), DataType::Uint16)),
            Self::Uint32(v) => Ok((v.into_iter().map(|x| x as i32).collect(), DataType::Uint32)),
            Self::Float32(v) => Ok((v.into_iter().map(|x| x as i32).collect(), DataType::Int32)),
            Self::Float64(v) => Ok((v.into_iter().map(|x| x as i32).collect(), DataType::Int32)),
            other => Err(VolwireError::UnsupportedDataType(format!(
                "Cannot treat {} data as an integer stream",
                other.kind_name()
            ))),
        }
    }

    /// Rebuilds a typed array of `dtype` from an `i32` stream, inverting the
    /// widening done by `into_i32_stream`.
    pub fn from_i32_stream(values: Vec<i32>, dtype: DataType) -> Self {
        match dtype {
            DataType::Int8 => Self::Int8(values.into_iter().map(|v| v as i8).collect()),
            DataType::Int16 => Self::Int16(values.into_iter().map(|v| v as i16).collect()),
            DataType::Int32 => Self::Int32(values),
            DataType::Uint8 => Self::Uint8(values.into_iter().map(|v| v as u8).collect()),
            DataType::Uint16 => Self::Uint16(values.into_iter().map(|v| v as u16).collect()),
            DataType::Uint32 => Self::Uint32(values.into_iter().map(|v| v as u32).collect()),
            DataType::Float32 => Self::Float32(values.into_iter().map(|v| v as f32).collect()),
            DataType::Float64 => Self::Float64(values.into_iter().map(|v| v as f64).collect()),
        }
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
