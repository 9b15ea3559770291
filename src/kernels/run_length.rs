//! This module contains the pure, stateless kernel for run-length encoding
//! and decoding.
//!
//! The wire form is a flat Int32 stream of interleaved `(value, run_length)`
//! pairs, one pair per maximal run of equal values. It is highly effective
//! for low-cardinality streams such as segmentation labels and presence
//! masks.

use crate::error::VolwireError;

/// Encodes a slice into interleaved `(value, run_length)` pairs.
pub fn encode(input_slice: &[i32]) -> Vec<i32> {
    if input_slice.is_empty() {
        return Vec::new();
    }

    let mut output = Vec::new();
    let mut current_val = input_slice[0];
    let mut run_count: i32 = 1;

    for &val in &input_slice[1..] {
        if val == current_val {
            run_count += 1;
        } else {
            output.push(current_val);
            output.push(run_count);
            current_val = val;
            run_count = 1;
        }
    }
    output.push(current_val);
    output.push(run_count);

    output
}

/// Expands interleaved pairs back into the original stream.
///
/// `num_values` is the declared source length; a pair stream that is odd,
/// carries non-positive counts, or expands to any other length is rejected.
pub fn decode(input_slice: &[i32], num_values: usize) -> Result<Vec<i32>, VolwireError> {
    if input_slice.len() % 2 != 0 {
        return Err(VolwireError::Bounds(
            "Run-length stream has a dangling value without a run length".to_string(),
        ));
    }

    let mut output = Vec::with_capacity(num_values);
    for pair in input_slice.chunks_exact(2) {
        let (value, run_length) = (pair[0], pair[1]);
        if run_length <= 0 {
            return Err(VolwireError::Bounds(format!(
                "Run length {} is not positive",
                run_length
            )));
        }
        if output.len() + run_length as usize > num_values {
            return Err(VolwireError::Bounds(format!(
                "Run-length stream expands past the declared {} values",
                num_values
            )));
        }
        output.extend(std::iter::repeat(value).take(run_length as usize));
    }

    if output.len() != num_values {
        return Err(VolwireError::Bounds(format!(
            "Run-length stream expanded to {} values, expected {}",
            output.len(),
            num_values
        )));
    }

    Ok(output)
}
