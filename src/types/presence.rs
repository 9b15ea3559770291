//! Per-row value presence codes.
//!
//! A masked column carries one code per row alongside its values. A column
//! with no mask is implicitly all `Present`.

use std::fmt;

/// The presence state of a single row in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValuePresence {
    /// The row holds an actual value.
    Present = 0,
    /// The producer deliberately left the row unspecified (`.` in text form).
    NotSpecified = 1,
    /// The value exists but is unknown to the producer (`?` in text form).
    Unknown = 2,
}

impl ValuePresence {
    /// The wire code stored in an encoded mask.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Maps a decoded mask code back to a presence state.
    ///
    /// Codes outside the defined set decode as `Unknown`: masks are advisory
    /// row flags, and a foreign producer's extension code must not make an
    /// otherwise valid column unreadable.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Present,
            1 => Self::NotSpecified,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ValuePresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_code_roundtrip() {
        for p in [
            ValuePresence::Present,
            ValuePresence::NotSpecified,
            ValuePresence::Unknown,
        ] {
            assert_eq!(ValuePresence::from_code(p.code()), p);
        }
    }

    #[test]
    fn test_out_of_range_code_maps_to_unknown() {
        assert_eq!(ValuePresence::from_code(3), ValuePresence::Unknown);
        assert_eq!(ValuePresence::from_code(255), ValuePresence::Unknown);
    }
}
