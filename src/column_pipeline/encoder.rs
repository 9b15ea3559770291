// In: src/column_pipeline/encoder.rs

//! The write side of the column codec: encoder descriptors and the chain
//! executor that applies them.
//!
//! An `EncoderChain` runs its encoders in order over an `ArrayValue`,
//! accumulating every `EncodingStep` they produce. A valid chain ends in raw
//! bytes; anything else is a malformed chain, reported before any partial
//! output can leak out.

use crate::column_pipeline::models::{ArrayValue, EncodedData, EncodingStep};
use crate::error::VolwireError;
use crate::kernels::{
    byte_array, delta, fixed_point, integer_packing, interval_quant, run_length, string_pool,
};
use crate::types::DataType;

//==================================================================================
// 1. Encoder Descriptors
//==================================================================================

/// One configured transform on the write side.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoder {
    /// Serialize the typed array as little-endian raw bytes. Terminal.
    ByteArray,
    /// Quantize floats as `round(v * factor)` Int32.
    FixedPoint { factor: f64 },
    /// Bucket floats uniformly over `[min, max]` into `num_steps` levels,
    /// emitting the bucket indices as `out_type`.
    IntervalQuantization {
        min: f64,
        max: f64,
        num_steps: i32,
        out_type: DataType,
    },
    /// Collapse runs of equal values into `(value, run_length)` pairs.
    RunLength,
    /// Emit consecutive differences; integers only (other sources are first
    /// converted to Int32).
    Delta,
    /// Narrow Int32 data to the cheapest of 1/2/4-byte elements. Terminal.
    IntegerPacking,
    /// Pool, offset-encode, and index-encode a string column. Terminal.
    StringArray,
}

impl Encoder {
    /// Checks the encoder's own parameters, before any data is touched.
    pub fn validate(&self) -> Result<(), VolwireError> {
        match self {
            Self::FixedPoint { factor } => {
                if !factor.is_finite() || *factor <= 0.0 {
                    return Err(VolwireError::Configuration(format!(
                        "FixedPoint requires a finite, positive factor (got {})",
                        factor
                    )));
                }
                Ok(())
            }
            Self::IntervalQuantization {
                min,
                max,
                num_steps,
                out_type,
            } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(VolwireError::Configuration(
                        "IntervalQuantization requires finite bounds".to_string(),
                    ));
                }
                if *num_steps < 2 {
                    return Err(VolwireError::Configuration(format!(
                        "IntervalQuantization requires at least 2 steps (got {})",
                        num_steps
                    )));
                }
                if !out_type.is_int() {
                    return Err(VolwireError::Configuration(format!(
                        "IntervalQuantization output type must be an integer type (got {})",
                        out_type
                    )));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Applies the transform, returning the next value in the chain and the
    /// steps it recorded.
    fn apply(&self, input: ArrayValue) -> Result<(ArrayValue, Vec<EncodingStep>), VolwireError> {
        match self {
            Self::ByteArray => apply_byte_array(input),
            Self::FixedPoint { factor } => apply_fixed_point(input, *factor),
            Self::IntervalQuantization {
                min,
                max,
                num_steps,
                out_type,
            } => apply_interval_quantization(input, *min, *max, *num_steps, *out_type),
            Self::RunLength => apply_run_length(input),
            Self::Delta => apply_delta(input),
            Self::IntegerPacking => apply_integer_packing(input),
            Self::StringArray => apply_string_array(input),
        }
    }
}

//==================================================================================
// 2. Encoder Chain
//==================================================================================

/// An ordered list of encoders applied to one column's data.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderChain {
    encoders: Vec<Encoder>,
}

impl EncoderChain {
    /// Starts a chain with its first encoder.
    pub fn by(encoder: Encoder) -> Self {
        Self {
            encoders: vec![encoder],
        }
    }

    /// Appends the next encoder.
    pub fn and(mut self, encoder: Encoder) -> Self {
        self.encoders.push(encoder);
        self
    }

    /// Validates every encoder's configuration without touching data.
    pub fn validate(&self) -> Result<(), VolwireError> {
        if self.encoders.is_empty() {
            return Err(VolwireError::MalformedEncoding(
                "Encoder chain contains no encoders".to_string(),
            ));
        }
        for encoder in &self.encoders {
            encoder.validate()?;
        }
        Ok(())
    }

    /// Runs the chain over `input` and assembles the `EncodedData` pair.
    pub fn encode(&self, input: ArrayValue) -> Result<EncodedData, VolwireError> {
        self.validate()?;

        let mut value = input;
        let mut encoding = Vec::new();
        for encoder in &self.encoders {
            let (next, mut steps) = encoder.apply(value)?;
            if steps.is_empty() {
                return Err(VolwireError::MalformedEncoding(format!(
                    "Encoder {:?} recorded no encoding step",
                    encoder
                )));
            }
            encoding.append(&mut steps);
            value = next;
        }

        match value {
            ArrayValue::Bytes(data) => Ok(EncodedData { encoding, data }),
            other => Err(VolwireError::MalformedEncoding(format!(
                "Chain output is {} data rather than raw bytes; end the chain with \
                 ByteArray, IntegerPacking, or StringArray",
                other.kind_name()
            ))),
        }
    }
}

//==================================================================================
// 3. Per-Encoder Application
//==================================================================================

fn apply_byte_array(input: ArrayValue) -> Result<(ArrayValue, Vec<EncodingStep>), VolwireError> {
    let mut bytes = Vec::new();
    let array_type = match &input {
        ArrayValue::Int8(v) => {
            byte_array::encode(v, &mut bytes);
            DataType::Int8
        }
        ArrayValue::Int16(v) => {
            byte_array::encode(v, &mut bytes);
            DataType::Int16
        }
        ArrayValue::Int32(v) => {
            byte_array::encode(v, &mut bytes);
            DataType::Int32
        }
        ArrayValue::Uint8(v) => {
            byte_array::encode(v, &mut bytes);
            DataType::Uint8
        }
        ArrayValue::Uint16(v) => {
            byte_array::encode(v, &mut bytes);
            DataType::Uint16
        }
        ArrayValue::Uint32(v) => {
            byte_array::encode(v, &mut bytes);
            DataType::Uint32
        }
        ArrayValue::Float32(v) => {
            byte_array::encode(v, &mut bytes);
            DataType::Float32
        }
        ArrayValue::Float64(v) => {
            byte_array::encode(v, &mut bytes);
            DataType::Float64
        }
        ArrayValue::Str(_) => {
            return Err(VolwireError::UnsupportedDataType(
                "ByteArray cannot serialize string data; use StringArray".to_string(),
            ))
        }
        ArrayValue::Bytes(_) => {
            return Err(VolwireError::UnsupportedDataType(
                "ByteArray input is already raw bytes".to_string(),
            ))
        }
    };
    Ok((
        ArrayValue::Bytes(bytes),
        vec![EncodingStep::ByteArray { array_type }],
    ))
}

fn apply_fixed_point(
    input: ArrayValue,
    factor: f64,
) -> Result<(ArrayValue, Vec<EncodingStep>), VolwireError> {
    let (values, src_type) = match input {
        ArrayValue::Float32(v) => (fixed_point::encode(&v, factor), DataType::Float32),
        ArrayValue::Float64(v) => (fixed_point::encode(&v, factor), DataType::Float64),
        other => {
            return Err(VolwireError::UnsupportedDataType(format!(
                "FixedPoint requires float input, got {}",
                other.kind_name()
            )))
        }
    };
    Ok((
        ArrayValue::Int32(values),
        vec![EncodingStep::FixedPoint { factor, src_type }],
    ))
}

fn apply_interval_quantization(
    input: ArrayValue,
    min: f64,
    max: f64,
    num_steps: i32,
    out_type: DataType,
) -> Result<(ArrayValue, Vec<EncodingStep>), VolwireError> {
    let (min, max, swapped) = interval_quant::normalize_bounds(min, max);
    if swapped {
        codec_metric!(
            "event" = "interval_quantization",
            "outcome" = "bounds_swapped",
            "min" = min,
            "max" = max
        );
    }
    let (values, src_type) = match input {
        ArrayValue::Float32(v) => (
            interval_quant::encode(&v, min, max, num_steps),
            DataType::Float32,
        ),
        ArrayValue::Float64(v) => (
            interval_quant::encode(&v, min, max, num_steps),
            DataType::Float64,
        ),
        other => {
            return Err(VolwireError::UnsupportedDataType(format!(
                "IntervalQuantization requires float input, got {}",
                other.kind_name()
            )))
        }
    };
    Ok((
        ArrayValue::from_i32_stream(values, out_type),
        vec![EncodingStep::IntervalQuantization {
            min,
            max,
            num_steps,
            src_type,
        }],
    ))
}

fn apply_run_length(input: ArrayValue) -> Result<(ArrayValue, Vec<EncodingStep>), VolwireError> {
    let (values, src_type) = input.into_i32_stream()?;
    let src_size = values.len() as i32;
    let pairs = run_length::encode(&values);
    Ok((
        ArrayValue::Int32(pairs),
        vec![EncodingStep::RunLength { src_type, src_size }],
    ))
}

fn apply_delta(input: ArrayValue) -> Result<(ArrayValue, Vec<EncodingStep>), VolwireError> {
    let input_kind = input.kind_name();
    let (values, mut src_type) = input.into_i32_stream()?;
    if !src_type.is_signed_int() {
        // Difference output is defined over signed integers; wider or float
        // sources travel as Int32 from here on.
        codec_metric!(
            "event" = "delta",
            "outcome" = "upcast_to_int32",
            "input" = input_kind
        );
        src_type = DataType::Int32;
    }
    let (deltas, origin) = delta::encode(&values);
    Ok((
        ArrayValue::Int32(deltas),
        vec![EncodingStep::Delta { origin, src_type }],
    ))
}

fn apply_integer_packing(
    input: ArrayValue,
) -> Result<(ArrayValue, Vec<EncodingStep>), VolwireError> {
    let (values, _) = input.into_i32_stream()?;
    let packing = integer_packing::determine_packing(&values);

    // The 4-byte outcome is a passthrough: no packing step, plain Int32 bytes.
    if packing.byte_count == 4 {
        return apply_byte_array(ArrayValue::Int32(values));
    }

    let src_size = values.len() as i32;
    let packed = match (packing.byte_count, packing.is_signed) {
        (1, true) => ArrayValue::Int8(integer_packing::pack(&values, packing.size)?),
        (1, false) => ArrayValue::Uint8(integer_packing::pack(&values, packing.size)?),
        (2, true) => ArrayValue::Int16(integer_packing::pack(&values, packing.size)?),
        (2, false) => ArrayValue::Uint16(integer_packing::pack(&values, packing.size)?),
        _ => {
            return Err(VolwireError::Internal(format!(
                "Width estimation produced an invalid byte count {}",
                packing.byte_count
            )))
        }
    };

    let (bytes, byte_steps) = apply_byte_array(packed)?;
    let mut encoding = vec![EncodingStep::IntegerPacking {
        byte_count: packing.byte_count as i32,
        is_unsigned: !packing.is_signed,
        src_size,
    }];
    encoding.extend(byte_steps);
    Ok((bytes, encoding))
}

fn apply_string_array(input: ArrayValue) -> Result<(ArrayValue, Vec<EncodingStep>), VolwireError> {
    let values = match input {
        ArrayValue::Str(v) => v,
        other => {
            return Err(VolwireError::UnsupportedDataType(format!(
                "StringArray requires string input, got {}",
                other.kind_name()
            )))
        }
    };

    let pool = string_pool::build(&values);

    let offset_chain = EncoderChain::by(Encoder::Delta).and(Encoder::IntegerPacking);
    let encoded_offsets = offset_chain.encode(ArrayValue::Int32(pool.offsets))?;

    let index_chain = EncoderChain::by(Encoder::Delta)
        .and(Encoder::RunLength)
        .and(Encoder::IntegerPacking);
    let encoded_indices = index_chain.encode(ArrayValue::Int32(pool.indices))?;

    Ok((
        ArrayValue::Bytes(encoded_indices.data),
        vec![EncodingStep::StringArray {
            data_encoding: encoded_indices.encoding,
            string_data: pool.string_data,
            offset_encoding: encoded_offsets.encoding,
            offsets: encoded_offsets.data,
        }],
    ))
}
