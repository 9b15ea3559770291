// In: src/reader/column.rs

//! A decoded column and its per-row accessors.
//!
//! Accessors coerce rather than fail: a numeric accessor on a string column
//! parses, a string accessor on a numeric column formats, and out-of-range
//! rows yield the empty/zero value. Consumers check `value_kind` when the
//! distinction between "zero" and "absent" matters.

use crate::column_pipeline::{decode_data, ArrayValue};
use crate::envelope::EncodedColumn;
use crate::error::VolwireError;
use crate::types::ValuePresence;

pub struct Column {
    pub(crate) data: ArrayValue,
    pub(crate) presence: Option<Vec<ValuePresence>>,
    pub(crate) undefined: bool,
}

/// The shared sentinel returned for category columns that do not exist.
/// Every accessor yields the empty/zero value and presence is always
/// `NotSpecified`, so optional fields read cleanly without existence checks.
static UNDEFINED_COLUMN: Column = Column {
    data: ArrayValue::Str(Vec::new()),
    presence: None,
    undefined: true,
};

impl Column {
    pub(crate) fn undefined() -> &'static Column {
        &UNDEFINED_COLUMN
    }

    /// Whether this is the sentinel for a column absent from its category.
    pub fn is_undefined(&self) -> bool {
        self.undefined
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// The decoded values.
    pub fn data(&self) -> &ArrayValue {
        &self.data
    }

    /// The decoded presence codes, if the column carried a mask.
    pub fn presence(&self) -> Option<&[ValuePresence]> {
        self.presence.as_deref()
    }

    pub fn string(&self, row: usize) -> String {
        match &self.data {
            ArrayValue::Str(v) => v.get(row).cloned().unwrap_or_default(),
            ArrayValue::Int8(v) => v.get(row).map(|x| x.to_string()).unwrap_or_default(),
            ArrayValue::Int16(v) => v.get(row).map(|x| x.to_string()).unwrap_or_default(),
            ArrayValue::Int32(v) => v.get(row).map(|x| x.to_string()).unwrap_or_default(),
            ArrayValue::Uint8(v) => v.get(row).map(|x| x.to_string()).unwrap_or_default(),
            ArrayValue::Uint16(v) => v.get(row).map(|x| x.to_string()).unwrap_or_default(),
            ArrayValue::Uint32(v) => v.get(row).map(|x| x.to_string()).unwrap_or_default(),
            ArrayValue::Float32(v) => v.get(row).map(|x| x.to_string()).unwrap_or_default(),
            ArrayValue::Float64(v) => v.get(row).map(|x| x.to_string()).unwrap_or_default(),
            ArrayValue::Bytes(_) => String::new(),
        }
    }

    pub fn int(&self, row: usize) -> i32 {
        match &self.data {
            ArrayValue::Str(v) => v
                .get(row)
                .and_then(|s| s.parse::<i32>().ok())
                .unwrap_or(0),
            _ => self.float(row) as i32,
        }
    }

    pub fn float(&self, row: usize) -> f64 {
        match &self.data {
            ArrayValue::Int8(v) => v.get(row).map(|&x| x as f64).unwrap_or(0.0),
            ArrayValue::Int16(v) => v.get(row).map(|&x| x as f64).unwrap_or(0.0),
            ArrayValue::Int32(v) => v.get(row).map(|&x| x as f64).unwrap_or(0.0),
            ArrayValue::Uint8(v) => v.get(row).map(|&x| x as f64).unwrap_or(0.0),
            ArrayValue::Uint16(v) => v.get(row).map(|&x| x as f64).unwrap_or(0.0),
            ArrayValue::Uint32(v) => v.get(row).map(|&x| x as f64).unwrap_or(0.0),
            ArrayValue::Float32(v) => v.get(row).map(|&x| x as f64).unwrap_or(0.0),
            ArrayValue::Float64(v) => v.get(row).copied().unwrap_or(0.0),
            ArrayValue::Str(v) => v
                .get(row)
                .and_then(|s| s.parse::<f64>().ok())
                .unwrap_or(0.0),
            ArrayValue::Bytes(_) => 0.0,
        }
    }

    /// The presence state of one row. Columns without a mask are fully
    /// present; the undefined sentinel is never present.
    pub fn value_kind(&self, row: usize) -> ValuePresence {
        if self.undefined {
            return ValuePresence::NotSpecified;
        }
        match &self.presence {
            Some(kinds) => kinds.get(row).copied().unwrap_or(ValuePresence::Present),
            None => ValuePresence::Present,
        }
    }
}

/// Decodes one encoded column, attaching presence codes from its mask.
pub(crate) fn decode_column(encoded: &EncodedColumn) -> Result<Column, VolwireError> {
    let data = decode_data(&encoded.data)?;

    let presence = match &encoded.mask {
        None => None,
        Some(mask) => {
            let (codes, _) = decode_data(mask)?.into_i32_stream()?;
            if codes.len() != data.len() {
                return Err(VolwireError::Bounds(format!(
                    "Column '{}' mask holds {} codes for {} rows",
                    encoded.name,
                    codes.len(),
                    data.len()
                )));
            }
            Some(
                codes
                    .into_iter()
                    .map(|code| {
                        u8::try_from(code)
                            .map(ValuePresence::from_code)
                            .unwrap_or(ValuePresence::Unknown)
                    })
                    .collect(),
            )
        }
    };

    Ok(Column {
        data,
        presence,
        undefined: false,
    })
}
