// In: src/config.rs

//! Configuration surface of the codec.
//!
//! These types are created once at the application boundary (the serving
//! layer's setup code) and passed down read-only. The codec itself never
//! reads configuration from the environment.

use serde::{Deserialize, Serialize};

/// Options for a `Writer` instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct WriterOptions {
    /// Producer name recorded in the envelope's `encoder` field.
    pub producer: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            producer: format!("volwire-core {}", crate::VERSION),
        }
    }
}

/// When a parsed file decodes its columns.
///
/// Both modes are observably identical; `Lazy` defers the per-column work to
/// first access, which pays off when a consumer touches only a few columns of
/// a wide category.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMode {
    /// Decode every column while parsing.
    Eager,
    /// Decode each column on first access and cache the result.
    #[default]
    Lazy,
}
