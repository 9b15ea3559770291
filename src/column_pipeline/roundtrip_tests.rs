//! Chain-level round-trip tests: every lossless chain must reproduce its
//! input exactly, every lossy chain must stay within its documented bound,
//! and malformed or foreign chains must fail cleanly with no partial output.

use super::decoder::decode_data;
use super::encoder::{Encoder, EncoderChain};
use super::models::{ArrayValue, EncodedData, EncodingStep};
use crate::error::VolwireError;
use crate::types::DataType;
use rand::Rng;

fn int_chain_roundtrip(chain: EncoderChain, original: Vec<i32>) {
    let encoded = chain.encode(ArrayValue::Int32(original.clone())).unwrap();
    let decoded = decode_data(&encoded).unwrap();
    assert_eq!(decoded, ArrayValue::Int32(original));
}

#[test]
fn test_byte_array_roundtrip_all_types() {
    let chain = EncoderChain::by(Encoder::ByteArray);
    let cases = vec![
        ArrayValue::Int8(vec![-1, 0, 1, i8::MIN, i8::MAX]),
        ArrayValue::Int16(vec![-300, 0, 300]),
        ArrayValue::Int32(vec![-70_000, 0, 70_000]),
        ArrayValue::Uint8(vec![0, 1, 255]),
        ArrayValue::Uint16(vec![0, 40_000]),
        ArrayValue::Uint32(vec![0, 3_000_000_000]),
        ArrayValue::Float32(vec![-1.5, 0.0, 1.5]),
        ArrayValue::Float64(vec![-1e300, 0.0, std::f64::consts::PI]),
    ];
    for original in cases {
        let encoded = chain.encode(original.clone()).unwrap();
        assert_eq!(encoded.encoding.len(), 1);
        assert_eq!(decode_data(&encoded).unwrap(), original);
    }
}

#[test]
fn test_delta_byte_array_exact_example() {
    let chain = EncoderChain::by(Encoder::Delta).and(Encoder::ByteArray);
    int_chain_roundtrip(chain, vec![1, 1, 2, 2, 10, -10]);
}

#[test]
fn test_delta_single_value() {
    let chain = EncoderChain::by(Encoder::Delta).and(Encoder::ByteArray);
    int_chain_roundtrip(chain, vec![5]);
}

#[test]
fn test_delta_records_origin_and_zeroed_first_slot() {
    let chain = EncoderChain::by(Encoder::Delta).and(Encoder::ByteArray);
    let encoded = chain
        .encode(ArrayValue::Int32(vec![1000, 1001, 1002]))
        .unwrap();
    match &encoded.encoding[0] {
        EncodingStep::Delta { origin, src_type } => {
            assert_eq!(*origin, 1000);
            assert_eq!(*src_type, DataType::Int32);
        }
        other => panic!("expected Delta step, got {:?}", other),
    }
    // First wire slot is zero so the origin alone reconstructs the first value.
    assert_eq!(&encoded.data[0..4], &[0, 0, 0, 0]);
}

#[test]
fn test_run_length_integer_packing_roundtrip() {
    let chain = EncoderChain::by(Encoder::RunLength).and(Encoder::IntegerPacking);
    int_chain_roundtrip(chain, vec![7, 7, 7, 7, 7, 1, 1, 9, 9, 9]);
}

#[test]
fn test_full_integer_chain_roundtrip() {
    let chain = EncoderChain::by(Encoder::Delta)
        .and(Encoder::RunLength)
        .and(Encoder::IntegerPacking);
    int_chain_roundtrip(chain, vec![100, 101, 102, 103, 104, 200, 200, 200, -5]);
}

#[test]
fn test_integer_packing_boundary_values() {
    let chain = EncoderChain::by(Encoder::IntegerPacking);
    for original in [
        vec![127, -128, 126, -127],
        vec![128, -129],
        vec![32_767, -32_768],
        vec![32_768, -32_769],
        vec![i32::MAX, i32::MIN + 1],
        vec![0; 17],
    ] {
        int_chain_roundtrip(chain.clone(), original);
    }
}

#[test]
fn test_integer_packing_four_byte_passthrough_has_no_packing_step() {
    let chain = EncoderChain::by(Encoder::IntegerPacking);
    let wide: Vec<i32> = vec![1_000_000_000, -1_000_000_000, 2_000_000_000];
    let encoded = chain.encode(ArrayValue::Int32(wide.clone())).unwrap();
    assert!(matches!(
        encoded.encoding.as_slice(),
        [EncodingStep::ByteArray {
            array_type: DataType::Int32
        }]
    ));
    assert_eq!(decode_data(&encoded).unwrap(), ArrayValue::Int32(wide));
}

#[test]
fn test_fixed_point_chain_stays_within_bound() {
    let factor = 1000.0;
    let chain = EncoderChain::by(Encoder::FixedPoint { factor })
        .and(Encoder::Delta)
        .and(Encoder::IntegerPacking);
    let original: Vec<f64> = vec![0.0, 1.0001, -2.5, 99.999, -0.0004];
    let encoded = chain
        .encode(ArrayValue::Float64(original.clone()))
        .unwrap();
    let decoded = match decode_data(&encoded).unwrap() {
        ArrayValue::Float64(v) => v,
        other => panic!("expected Float64, got {:?}", other),
    };
    let bound = 1.0 / (2.0 * factor) + 1e-9;
    for (a, b) in original.iter().zip(decoded.iter()) {
        assert!((a - b).abs() <= bound, "{} vs {}", a, b);
    }
}

#[test]
fn test_interval_quantization_chain_stays_within_bound() {
    let (min, max, num_steps) = (0.0, 1.0, 256);
    let chain = EncoderChain::by(Encoder::IntervalQuantization {
        min,
        max,
        num_steps,
        out_type: DataType::Uint8,
    })
    .and(Encoder::ByteArray);
    let original: Vec<f32> = vec![0.0, 0.25, 0.333, 0.5, 0.999, 1.0];
    let encoded = chain
        .encode(ArrayValue::Float32(original.clone()))
        .unwrap();
    let decoded = match decode_data(&encoded).unwrap() {
        ArrayValue::Float32(v) => v,
        other => panic!("expected Float32, got {:?}", other),
    };
    let bound = (max - min) / num_steps as f64 + 1e-6;
    for (a, b) in original.iter().zip(decoded.iter()) {
        assert!((a - b).abs() as f64 <= bound, "{} vs {}", a, b);
    }
}

#[test]
fn test_interval_quantization_reversed_bounds_behave_like_ordered() {
    let original: Vec<f64> = vec![2.0, 3.5, 5.0];
    let make = |min, max| {
        EncoderChain::by(Encoder::IntervalQuantization {
            min,
            max,
            num_steps: 64,
            out_type: DataType::Uint8,
        })
        .and(Encoder::ByteArray)
        .encode(ArrayValue::Float64(original.clone()))
        .unwrap()
    };
    assert_eq!(make(2.0, 5.0), make(5.0, 2.0));
}

#[test]
fn test_string_array_roundtrip_with_dedup() {
    let chain = EncoderChain::by(Encoder::StringArray);
    let original: Vec<String> = ["a", "", "a"].iter().map(|s| s.to_string()).collect();
    let encoded = chain.encode(ArrayValue::Str(original.clone())).unwrap();

    match &encoded.encoding[0] {
        EncodingStep::StringArray { string_data, .. } => assert_eq!(string_data, "a"),
        other => panic!("expected StringArray step, got {:?}", other),
    }
    assert_eq!(decode_data(&encoded).unwrap(), ArrayValue::Str(original));
}

#[test]
fn test_string_array_roundtrip_larger_column() {
    let chain = EncoderChain::by(Encoder::StringArray);
    let original: Vec<String> = (0..500)
        .map(|i| match i % 4 {
            0 => "membrane".to_string(),
            1 => "nucleus".to_string(),
            2 => String::new(),
            _ => format!("segment-{}", i % 7),
        })
        .collect();
    let encoded = chain.encode(ArrayValue::Str(original.clone())).unwrap();
    assert_eq!(decode_data(&encoded).unwrap(), ArrayValue::Str(original));
}

#[test]
fn test_empty_arrays_roundtrip_through_every_chain() {
    let int_chains = vec![
        EncoderChain::by(Encoder::ByteArray),
        EncoderChain::by(Encoder::Delta).and(Encoder::ByteArray),
        EncoderChain::by(Encoder::RunLength).and(Encoder::ByteArray),
        EncoderChain::by(Encoder::IntegerPacking),
    ];
    for chain in int_chains {
        int_chain_roundtrip(chain, Vec::new());
    }

    let encoded = EncoderChain::by(Encoder::StringArray)
        .encode(ArrayValue::Str(Vec::new()))
        .unwrap();
    assert_eq!(decode_data(&encoded).unwrap(), ArrayValue::Str(Vec::new()));
}

#[test]
fn test_randomized_integer_roundtrips() {
    let mut rng = rand::rng();
    let chain = EncoderChain::by(Encoder::Delta)
        .and(Encoder::RunLength)
        .and(Encoder::IntegerPacking);
    for _ in 0..20 {
        let len = rng.random_range(0..600);
        let original: Vec<i32> = (0..len)
            .map(|_| rng.random_range(-100_000..100_000))
            .collect();
        int_chain_roundtrip(chain.clone(), original);
    }
}

//==================================================================================
// Failure Modes
//==================================================================================

#[test]
fn test_unrecognized_step_fails_with_unsupported_encoding() {
    let encoded = EncodedData {
        encoding: vec![EncodingStep::Unrecognized],
        data: vec![1, 2, 3, 4],
    };
    let result = decode_data(&encoded);
    assert!(matches!(
        result,
        Err(VolwireError::UnsupportedEncoding(_))
    ));
}

#[test]
fn test_fixed_point_without_factor_fails_before_touching_data() {
    let chain = EncoderChain::by(Encoder::FixedPoint { factor: 0.0 }).and(Encoder::ByteArray);
    assert!(matches!(
        chain.validate(),
        Err(VolwireError::Configuration(_))
    ));
    let result = chain.encode(ArrayValue::Float64(vec![1.0, 2.0]));
    assert!(matches!(result, Err(VolwireError::Configuration(_))));
}

#[test]
fn test_chain_must_end_in_raw_bytes() {
    let chain = EncoderChain::by(Encoder::Delta);
    let result = chain.encode(ArrayValue::Int32(vec![1, 2, 3]));
    assert!(matches!(result, Err(VolwireError::MalformedEncoding(_))));
}

#[test]
fn test_empty_encoding_chain_is_malformed() {
    let encoded = EncodedData {
        encoding: Vec::new(),
        data: vec![0, 0, 0, 0],
    };
    assert!(matches!(
        decode_data(&encoded),
        Err(VolwireError::MalformedEncoding(_))
    ));
}

#[test]
fn test_corrupt_declared_size_is_a_bounds_error() {
    let chain = EncoderChain::by(Encoder::RunLength).and(Encoder::ByteArray);
    let mut encoded = chain
        .encode(ArrayValue::Int32(vec![4, 4, 4, 9, 9]))
        .unwrap();
    // Inflate the declared source size past what the pairs expand to.
    if let EncodingStep::RunLength { src_size, .. } = &mut encoded.encoding[0] {
        *src_size = 1_000;
    }
    assert!(matches!(
        decode_data(&encoded),
        Err(VolwireError::Bounds(_))
    ));
}

#[test]
fn test_truncated_packed_stream_is_a_bounds_error() {
    let chain = EncoderChain::by(Encoder::IntegerPacking);
    let mut encoded = chain
        .encode(ArrayValue::Int32(vec![300, 300, 300]))
        .unwrap();
    encoded.data.truncate(encoded.data.len() - 1);
    assert!(matches!(
        decode_data(&encoded),
        Err(VolwireError::Bounds(_))
    ));
}
