// In: src/column_pipeline/decoder.rs

//! The read side of the column codec: a total dispatcher over the closed set
//! of encoding steps, applied in reverse chain order.
//!
//! Every decode call either yields the fully reconstructed array or fails;
//! there is no partial output. Declared counts in the steps come from
//! untrusted input, so every expansion is checked against what the byte
//! stream actually provides.

use crate::column_pipeline::models::{ArrayValue, EncodedData, EncodingStep};
use crate::error::VolwireError;
use crate::kernels::{
    byte_array, delta, fixed_point, integer_packing, interval_quant, run_length, string_pool,
};
use crate::types::DataType;

/// Decodes an `EncodedData` pair by undoing its steps from last to first.
pub fn decode_data(encoded: &EncodedData) -> Result<ArrayValue, VolwireError> {
    if encoded.encoding.is_empty() {
        return Err(VolwireError::MalformedEncoding(
            "Encoding chain is empty".to_string(),
        ));
    }

    let mut value = ArrayValue::Bytes(encoded.data.clone());
    for step in encoded.encoding.iter().rev() {
        value = decode_step(step, value)?;
    }

    if matches!(value, ArrayValue::Bytes(_)) {
        return Err(VolwireError::MalformedEncoding(
            "Encoding chain never leaves raw bytes".to_string(),
        ));
    }
    Ok(value)
}

/// Undoes a single step. Total over the step set; the catch-all variant for
/// foreign step kinds is rejected here.
fn decode_step(step: &EncodingStep, input: ArrayValue) -> Result<ArrayValue, VolwireError> {
    match step {
        EncodingStep::ByteArray { array_type } => decode_byte_array(*array_type, input),
        EncodingStep::FixedPoint { factor, src_type } => {
            decode_fixed_point(*factor, *src_type, input)
        }
        EncodingStep::IntervalQuantization {
            min,
            max,
            num_steps,
            src_type,
        } => decode_interval_quantization(*min, *max, *num_steps, *src_type, input),
        EncodingStep::RunLength { src_type, src_size } => {
            decode_run_length(*src_type, *src_size, input)
        }
        EncodingStep::Delta { origin, src_type } => decode_delta(*origin, *src_type, input),
        EncodingStep::IntegerPacking {
            byte_count,
            is_unsigned,
            src_size,
        } => decode_integer_packing(*byte_count, *is_unsigned, *src_size, input),
        EncodingStep::StringArray {
            data_encoding,
            string_data,
            offset_encoding,
            offsets,
        } => decode_string_array(data_encoding, string_data, offset_encoding, offsets, input),
        EncodingStep::Unrecognized => Err(VolwireError::UnsupportedEncoding(
            "Encoding chain contains a step kind this build does not know".to_string(),
        )),
    }
}

fn expect_bytes(step: &'static str, input: ArrayValue) -> Result<Vec<u8>, VolwireError> {
    match input {
        ArrayValue::Bytes(bytes) => Ok(bytes),
        other => Err(VolwireError::MalformedEncoding(format!(
            "{} must be the terminal step of its chain, but received {} data",
            step,
            other.kind_name()
        ))),
    }
}

fn decode_byte_array(array_type: DataType, input: ArrayValue) -> Result<ArrayValue, VolwireError> {
    let bytes = expect_bytes("ByteArray", input)?;
    Ok(match array_type {
        DataType::Int8 => ArrayValue::Int8(byte_array::decode(&bytes)?),
        DataType::Int16 => ArrayValue::Int16(byte_array::decode(&bytes)?),
        DataType::Int32 => ArrayValue::Int32(byte_array::decode(&bytes)?),
        DataType::Uint8 => ArrayValue::Uint8(byte_array::decode(&bytes)?),
        DataType::Uint16 => ArrayValue::Uint16(byte_array::decode(&bytes)?),
        DataType::Uint32 => ArrayValue::Uint32(byte_array::decode(&bytes)?),
        DataType::Float32 => ArrayValue::Float32(byte_array::decode(&bytes)?),
        DataType::Float64 => ArrayValue::Float64(byte_array::decode(&bytes)?),
    })
}

fn decode_fixed_point(
    factor: f64,
    src_type: DataType,
    input: ArrayValue,
) -> Result<ArrayValue, VolwireError> {
    if !factor.is_finite() || factor == 0.0 {
        return Err(VolwireError::MalformedEncoding(format!(
            "FixedPoint factor {} cannot be inverted",
            factor
        )));
    }
    let (values, _) = input.into_i32_stream()?;
    match src_type {
        DataType::Float32 => Ok(ArrayValue::Float32(fixed_point::decode(&values, factor))),
        DataType::Float64 => Ok(ArrayValue::Float64(fixed_point::decode(&values, factor))),
        other => Err(VolwireError::MalformedEncoding(format!(
            "FixedPoint source type must be a float type, got {}",
            other
        ))),
    }
}

fn decode_interval_quantization(
    min: f64,
    max: f64,
    num_steps: i32,
    src_type: DataType,
    input: ArrayValue,
) -> Result<ArrayValue, VolwireError> {
    if num_steps < 2 {
        return Err(VolwireError::MalformedEncoding(format!(
            "IntervalQuantization step count {} cannot be inverted",
            num_steps
        )));
    }
    let (values, _) = input.into_i32_stream()?;
    match src_type {
        DataType::Float32 => Ok(ArrayValue::Float32(interval_quant::decode(
            &values, min, max, num_steps,
        ))),
        DataType::Float64 => Ok(ArrayValue::Float64(interval_quant::decode(
            &values, min, max, num_steps,
        ))),
        other => Err(VolwireError::MalformedEncoding(format!(
            "IntervalQuantization source type must be a float type, got {}",
            other
        ))),
    }
}

fn decode_run_length(
    src_type: DataType,
    src_size: i32,
    input: ArrayValue,
) -> Result<ArrayValue, VolwireError> {
    let num_values = usize::try_from(src_size).map_err(|_| {
        VolwireError::Bounds(format!("Negative run-length source size {}", src_size))
    })?;
    let (pairs, _) = input.into_i32_stream()?;
    let values = run_length::decode(&pairs, num_values)?;
    Ok(ArrayValue::from_i32_stream(values, src_type))
}

fn decode_delta(
    origin: i32,
    src_type: DataType,
    input: ArrayValue,
) -> Result<ArrayValue, VolwireError> {
    let (deltas, _) = input.into_i32_stream()?;
    let values = delta::decode(&deltas, origin);
    Ok(ArrayValue::from_i32_stream(values, src_type))
}

fn decode_integer_packing(
    byte_count: i32,
    is_unsigned: bool,
    src_size: i32,
    input: ArrayValue,
) -> Result<ArrayValue, VolwireError> {
    let num_values = usize::try_from(src_size).map_err(|_| {
        VolwireError::Bounds(format!("Negative packing source size {}", src_size))
    })?;

    let values = match (byte_count, is_unsigned, input) {
        (1, false, ArrayValue::Int8(packed)) => integer_packing::unpack(&packed, num_values)?,
        (1, true, ArrayValue::Uint8(packed)) => integer_packing::unpack(&packed, num_values)?,
        (2, false, ArrayValue::Int16(packed)) => integer_packing::unpack(&packed, num_values)?,
        (2, true, ArrayValue::Uint16(packed)) => integer_packing::unpack(&packed, num_values)?,
        (4, _, other) => {
            // Passthrough form emitted by encoders that chose not to narrow.
            let (values, _) = other.into_i32_stream()?;
            if values.len() != num_values {
                return Err(VolwireError::Bounds(format!(
                    "Packed stream holds {} values, {} declared",
                    values.len(),
                    num_values
                )));
            }
            values
        }
        (count, unsigned, other) => {
            return Err(VolwireError::MalformedEncoding(format!(
                "IntegerPacking(byteCount={}, isUnsigned={}) cannot consume {} data",
                count,
                unsigned,
                other.kind_name()
            )))
        }
    };
    Ok(ArrayValue::Int32(values))
}

fn decode_string_array(
    data_encoding: &[EncodingStep],
    string_data: &str,
    offset_encoding: &[EncodingStep],
    offsets: &[u8],
    input: ArrayValue,
) -> Result<ArrayValue, VolwireError> {
    let bytes = expect_bytes("StringArray", input)?;

    let decoded_offsets = decode_data(&EncodedData {
        encoding: offset_encoding.to_vec(),
        data: offsets.to_vec(),
    })?;
    let (offsets, _) = decoded_offsets.into_i32_stream()?;

    let decoded_indices = decode_data(&EncodedData {
        encoding: data_encoding.to_vec(),
        data: bytes,
    })?;
    let (indices, _) = decoded_indices.into_i32_stream()?;

    let values = string_pool::expand(string_data, &offsets, &indices)?;
    Ok(ArrayValue::Str(values))
}
