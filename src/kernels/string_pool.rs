//! This module contains the pure, stateless kernel for string pool
//! construction and expansion.
//!
//! A string column is reduced to three parts: a deduplicated pool of the
//! distinct strings concatenated in first-occurrence order, an Int32 offset
//! table of prefix-summed byte lengths (`offsets[0] = 0`), and one Int32 pool
//! index per row, with `-1` standing in for empty or absent strings.

use crate::error::VolwireError;
use std::collections::HashMap;

/// The decomposed form of a string column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringPool {
    pub string_data: String,
    pub offsets: Vec<i32>,
    pub indices: Vec<i32>,
}

/// Builds the pool, offsets, and per-row indices for a string slice.
pub fn build(values: &[String]) -> StringPool {
    let mut seen = HashMap::<&str, i32>::new();
    let mut string_data = String::new();
    let mut offsets: Vec<i32> = vec![0];
    let mut indices = Vec::with_capacity(values.len());

    for value in values {
        if value.is_empty() {
            indices.push(-1);
            continue;
        }
        let index = match seen.get(value.as_str()) {
            Some(&index) => index,
            None => {
                let index = seen.len() as i32;
                seen.insert(value, index);
                string_data.push_str(value);
                offsets.push(string_data.len() as i32);
                index
            }
        };
        indices.push(index);
    }

    StringPool {
        string_data,
        offsets,
        indices,
    }
}

/// Reassembles per-row strings from a pool, offset table, and index stream.
pub fn expand(
    string_data: &str,
    offsets: &[i32],
    indices: &[i32],
) -> Result<Vec<String>, VolwireError> {
    let pool_len = offsets.len().saturating_sub(1);
    let mut pool = Vec::with_capacity(pool_len);
    for window in offsets.windows(2) {
        let (start, end) = (window[0], window[1]);
        if start < 0 || end < start {
            return Err(VolwireError::Bounds(format!(
                "Offset table entry {}..{} is not monotonically increasing",
                start, end
            )));
        }
        let slice = string_data.get(start as usize..end as usize).ok_or_else(|| {
            VolwireError::Bounds(format!(
                "Offset {}..{} is outside the {}-byte string pool",
                start,
                end,
                string_data.len()
            ))
        })?;
        pool.push(slice);
    }

    let mut output = Vec::with_capacity(indices.len());
    for &index in indices {
        if index == -1 {
            output.push(String::new());
        } else {
            let entry = usize::try_from(index)
                .ok()
                .and_then(|i| pool.get(i))
                .ok_or_else(|| {
                    VolwireError::Bounds(format!(
                        "String index {} is outside the {}-entry pool",
                        index, pool_len
                    ))
                })?;
            output.push((*entry).to_string());
        }
    }
    Ok(output)
}
