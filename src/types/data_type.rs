//! This module defines the canonical, type-safe representation of the element
//! types a column can carry on the wire.

use crate::error::VolwireError;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

/// The canonical element type of an encoded array.
///
/// The discriminants are the fixed wire codes of the format and must never
/// change: 1-6 for the integer family, 32/33 for the float family.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum DataType {
    Int8 = 1,
    Int16 = 2,
    Int32 = 3,
    Uint8 = 4,
    Uint16 = 5,
    Uint32 = 6,
    Float32 = 32,
    Float64 = 33,
}

impl DataType {
    /// Converts a wire code into a `DataType`.
    pub fn from_code(code: u8) -> Result<Self, VolwireError> {
        match code {
            1 => Ok(Self::Int8),
            2 => Ok(Self::Int16),
            3 => Ok(Self::Int32),
            4 => Ok(Self::Uint8),
            5 => Ok(Self::Uint16),
            6 => Ok(Self::Uint32),
            32 => Ok(Self::Float32),
            33 => Ok(Self::Float64),
            c => Err(VolwireError::UnsupportedDataType(format!(
                "Unknown element type code {}",
                c
            ))),
        }
    }

    /// Returns the wire code for this `DataType`.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Returns `true` if the data type is a signed integer.
    pub fn is_signed_int(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32)
    }

    /// Returns `true` if the data type is an integer of any signedness.
    pub fn is_int(&self) -> bool {
        !self.is_float()
    }

    /// Returns `true` if the data type is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl From<DataType> for u8 {
    fn from(dtype: DataType) -> u8 {
        dtype.code()
    }
}

impl TryFrom<u8> for DataType {
    type Error = VolwireError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

/// Provides the canonical string representation for a `DataType`.
impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
