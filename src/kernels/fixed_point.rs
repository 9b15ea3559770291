//! This module contains the pure, stateless kernel for fixed-point
//! quantization and dequantization.
//!
//! Floats are scaled by a caller-chosen factor and rounded to Int32, which
//! turns coordinate-like streams into integer data the lossless transforms
//! can narrow. The reconstruction error is bounded by `1 / (2 * factor)`.

use num_traits::Float;

/// Quantizes a float slice: `round(v * factor)` as Int32.
pub fn encode<F: Float>(input_slice: &[F], factor: f64) -> Vec<i32> {
    input_slice
        .iter()
        .map(|v| (v.to_f64().unwrap_or(0.0) * factor).round() as i32)
        .collect()
}

/// Dequantizes back to the source float type: `v / factor`.
pub fn decode<F: Float>(input_slice: &[i32], factor: f64) -> Vec<F> {
    input_slice
        .iter()
        .map(|&v| F::from(v as f64 / factor).unwrap_or_else(F::zero))
        .collect()
}
