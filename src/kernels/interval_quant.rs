//! This module contains the pure, stateless kernel for interval quantization
//! and dequantization.
//!
//! A float range `[min, max]` is bucketed uniformly into `num_steps` levels;
//! values are clipped into the range before quantization. The reconstruction
//! error is bounded by one bucket width.

use num_traits::Float;

/// Orders a `(min, max)` pair, reporting whether the bounds were reversed.
///
/// Reversed bounds are accepted rather than rejected so parameter order
/// mistakes by producers keep yielding a valid (identical) quantization.
pub fn normalize_bounds(min: f64, max: f64) -> (f64, f64, bool) {
    if max < min {
        (max, min, true)
    } else {
        (min, max, false)
    }
}

fn bucket_width(min: f64, max: f64, num_steps: i32) -> f64 {
    (max - min) / (num_steps - 1) as f64
}

/// Quantizes a float slice into `0..num_steps` bucket indices.
///
/// `min`/`max` must already be ordered (see `normalize_bounds`) and
/// `num_steps` must be at least 2.
pub fn encode<F: Float>(input_slice: &[F], min: f64, max: f64, num_steps: i32) -> Vec<i32> {
    let delta = bucket_width(min, max, num_steps);
    input_slice
        .iter()
        .map(|value| {
            let v = value.to_f64().unwrap_or(0.0);
            if v <= min {
                0
            } else if v >= max {
                num_steps - 1
            } else {
                ((v - min) / delta).round() as i32
            }
        })
        .collect()
}

/// Maps bucket indices back to the source float type: `min + v * delta`.
pub fn decode<F: Float>(input_slice: &[i32], min: f64, max: f64, num_steps: i32) -> Vec<F> {
    let (min, max, _) = normalize_bounds(min, max);
    let delta = bucket_width(min, max, num_steps);
    input_slice
        .iter()
        .map(|&v| F::from(min + v as f64 * delta).unwrap_or_else(F::zero))
        .collect()
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantization_error_is_bounded() {
        let (min, max, num_steps) = (-10.0, 10.0, 255);
        let original: Vec<f64> = vec![-10.0, -3.77, 0.0, 0.004, 9.21, 10.0];
        let encoded = encode(&original, min, max, num_steps);
        let decoded: Vec<f64> = decode(&encoded, min, max, num_steps);
        let bound = (max - min) / num_steps as f64 + 1e-9;
        for (a, b) in original.iter().zip(decoded.iter()) {
            assert!((a - b).abs() <= bound, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_values_are_clipped_into_range() {
        let encoded = encode(&[-100.0f64, 100.0], 0.0, 1.0, 11);
        assert_eq!(encoded, vec![0, 10]);
    }

    #[test]
    fn test_normalize_bounds_swaps_reversed_pair() {
        assert_eq!(normalize_bounds(5.0, 1.0), (1.0, 5.0, true));
        assert_eq!(normalize_bounds(1.0, 5.0), (1.0, 5.0, false));
    }

    #[test]
    fn test_degenerate_range_quantizes_to_zero() {
        let encoded = encode(&[3.0f32, 3.0, 3.0], 3.0, 3.0, 16);
        assert_eq!(encoded, vec![0, 0, 0]);
        let decoded: Vec<f32> = decode(&encoded, 3.0, 3.0, 16);
        assert_eq!(decoded, vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_empty_slice() {
        let encoded = encode::<f64>(&[], 0.0, 1.0, 4);
        assert!(encoded.is_empty());
    }
}
