//! This module contains the pure, stateless kernel for escape-sentinel
//! integer packing and unpacking.
//!
//! Int32 streams whose values are mostly small are re-expressed in 1- or
//! 2-byte elements. A value too wide for the narrow type is emitted as a
//! series of limit-valued escape sentinels followed by the residual; the
//! decoder accumulates sentinels until it sees a non-sentinel element. The
//! choice between 1, 2 and 4 bytes is made by an estimation pass that mirrors
//! the packing loop exactly, so the chosen width is the cheapest one that
//! still round-trips.

use crate::error::VolwireError;
use num_traits::{FromPrimitive, PrimInt, ToPrimitive};

/// The outcome of the width-estimation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packing {
    /// Element width of the packed stream: 1, 2, or 4 (passthrough).
    pub byte_count: u8,
    /// Whether the packed stream needs a signed element type.
    pub is_signed: bool,
    /// Number of elements the packed stream will hold.
    pub size: usize,
}

/// Counts the packed elements needed for `data` under a given positive limit,
/// mirroring the emission loop of `pack`.
fn packing_size(data: &[i32], upper_limit: i64) -> usize {
    let lower_limit = -upper_limit - 1;
    let mut size: usize = 0;
    for &value in data {
        let value = value as i64;
        if value == 0 {
            size += 1;
        } else if value > 0 {
            size += ((value + upper_limit - 1) / upper_limit) as usize;
            if value % upper_limit == 0 {
                size += 1;
            }
        } else {
            let magnitude = -value;
            let limit = -lower_limit;
            size += ((magnitude + limit - 1) / limit) as usize;
            if magnitude % limit == 0 {
                size += 1;
            }
        }
    }
    size
}

/// Picks the cheapest element width for `data`.
pub fn determine_packing(data: &[i32]) -> Packing {
    let is_signed = data.iter().any(|&v| v < 0);
    let size8 = packing_size(data, if is_signed { 0x7F } else { 0xFF });
    let size16 = packing_size(data, if is_signed { 0x7FFF } else { 0xFFFF });

    if data.len() * 4 < size16 * 2 {
        Packing {
            byte_count: 4,
            is_signed,
            size: data.len(),
        }
    } else if size16 * 2 < size8 {
        Packing {
            byte_count: 2,
            is_signed,
            size: size16,
        }
    } else {
        Packing {
            byte_count: 1,
            is_signed,
            size: size8,
        }
    }
}

/// Packs an Int32 stream into the narrow element type `T`.
///
/// `size_hint` is the element count predicted by `determine_packing`.
pub fn pack<T>(input_slice: &[i32], size_hint: usize) -> Result<Vec<T>, VolwireError>
where
    T: PrimInt + FromPrimitive,
{
    let cast = |v: i32| {
        T::from_i32(v).ok_or_else(|| {
            VolwireError::Internal(format!("Value {} does not fit the packed element type", v))
        })
    };
    let upper_limit = T::max_value()
        .to_i32()
        .ok_or_else(|| VolwireError::Internal("Packed element type wider than Int32".into()))?;
    let lower_limit = -upper_limit - 1;

    let mut packed = Vec::with_capacity(size_hint);
    for &v in input_slice {
        let mut value = v;
        if value >= 0 {
            while value >= upper_limit {
                packed.push(cast(upper_limit)?);
                value -= upper_limit;
            }
        } else {
            while value <= lower_limit {
                packed.push(cast(lower_limit)?);
                value -= lower_limit;
            }
        }
        packed.push(cast(value)?);
    }
    Ok(packed)
}

/// Unpacks a narrow stream back into `num_values` Int32 values.
pub fn unpack<T>(packed: &[T], num_values: usize) -> Result<Vec<i32>, VolwireError>
where
    T: PrimInt + ToPrimitive,
{
    let upper_limit = T::max_value()
        .to_i32()
        .ok_or_else(|| VolwireError::Internal("Packed element type wider than Int32".into()))?;
    let lower_limit = -upper_limit - 1;

    let mut output = Vec::with_capacity(num_values);
    let mut j = 0;
    while output.len() < num_values {
        let mut value: i32 = 0;
        loop {
            let t = packed
                .get(j)
                .ok_or_else(|| {
                    VolwireError::Bounds(format!(
                        "Packed stream exhausted after {} of {} values",
                        output.len(),
                        num_values
                    ))
                })?
                .to_i32()
                .ok_or_else(|| {
                    VolwireError::Internal("Packed element does not fit Int32".into())
                })?;
            j += 1;
            value = value.wrapping_add(t);
            if t != upper_limit && t != lower_limit {
                break;
            }
        }
        output.push(value);
    }
    Ok(output)
}
