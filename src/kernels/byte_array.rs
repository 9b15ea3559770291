//! This module contains the pure, stateless kernel for the terminal byte
//! serialization transform.
//!
//! It converts typed slices to and from the little-endian wire representation.
//! On little-endian hosts the encode path is a plain `bytemuck` byte copy; the
//! decode path always reassembles elements explicitly, which keeps it correct
//! for any host byte order and free of alignment requirements on the input.

use crate::error::VolwireError;
use crate::types::DataType;
use bytemuck::Pod;

/// An element type that can cross the wire inside a byte array.
///
/// The eight implementations below are the complete set; the `DATA_TYPE`
/// constant ties each native type to its registry tag.
pub trait WireElement: Pod {
    const DATA_TYPE: DataType;

    fn write_le(&self, out: &mut Vec<u8>);
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_wire_element {
    ($native:ty, $tag:expr) => {
        impl WireElement for $native {
            const DATA_TYPE: DataType = $tag;

            #[inline]
            fn write_le(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$native>()];
                buf.copy_from_slice(bytes);
                <$native>::from_le_bytes(buf)
            }
        }
    };
}

impl_wire_element!(i8, DataType::Int8);
impl_wire_element!(i16, DataType::Int16);
impl_wire_element!(i32, DataType::Int32);
impl_wire_element!(u8, DataType::Uint8);
impl_wire_element!(u16, DataType::Uint16);
impl_wire_element!(u32, DataType::Uint32);
impl_wire_element!(f32, DataType::Float32);
impl_wire_element!(f64, DataType::Float64);

/// Serializes a typed slice into little-endian raw bytes.
pub fn encode<T: WireElement>(input_slice: &[T], output_buf: &mut Vec<u8>) {
    output_buf.clear();
    #[cfg(target_endian = "little")]
    {
        output_buf.extend_from_slice(bytemuck::cast_slice(input_slice));
    }
    #[cfg(not(target_endian = "little"))]
    {
        output_buf.reserve(input_slice.len() * std::mem::size_of::<T>());
        for value in input_slice {
            value.write_le(output_buf);
        }
    }
}

/// Reassembles a typed vector from little-endian raw bytes.
pub fn decode<T: WireElement>(input_bytes: &[u8]) -> Result<Vec<T>, VolwireError> {
    let element_size = std::mem::size_of::<T>();
    if input_bytes.len() % element_size != 0 {
        return Err(VolwireError::Bounds(format!(
            "Byte array length {} is not a multiple of the {} element size {}",
            input_bytes.len(),
            T::DATA_TYPE,
            element_size
        )));
    }
    Ok(input_bytes.chunks_exact(element_size).map(T::read_le).collect())
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_array_roundtrip_i32() {
        let original: Vec<i32> = vec![0, -1, 1, i32::MIN, i32::MAX];
        let mut encoded = Vec::new();
        encode(&original, &mut encoded);
        assert_eq!(encoded.len(), original.len() * 4);
        // Spot-check the wire order of one element.
        assert_eq!(&encoded[4..8], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(decode::<i32>(&encoded).unwrap(), original);
    }

    #[test]
    fn test_byte_array_roundtrip_f64() {
        let original: Vec<f64> = vec![0.0, -2.5, std::f64::consts::PI];
        let mut encoded = Vec::new();
        encode(&original, &mut encoded);
        assert_eq!(decode::<f64>(&encoded).unwrap(), original);
    }

    #[test]
    fn test_byte_array_empty_slice() {
        let original: Vec<u16> = vec![];
        let mut encoded = Vec::new();
        encode(&original, &mut encoded);
        assert!(encoded.is_empty());
        assert!(decode::<u16>(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_decode_invalid_length_error() {
        let bytes = vec![1u8, 2, 3, 4, 5];
        let result = decode::<i32>(&bytes);
        assert!(matches!(result, Err(VolwireError::Bounds(_))));
    }
}
