//! This file is the root of the `volwire` Rust crate.
//!
//! volwire is the columnar binary wire codec of the volumetric dataset
//! server: typed per-field arrays pass through chains of reversible
//! transforms and land in a versioned, self-describing MessagePack envelope;
//! the reader runs the chains in reverse. The crate's responsibilities end at
//! the codec boundary: HTTP serving, chunked-array storage, and the
//! downsampling pipeline are the callers' concern.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate.

#[doc(hidden)]
pub use log; // Re-exported for the `codec_metric!` macro expansion.

pub mod column_pipeline;
pub mod envelope;
pub mod kernels;
pub mod reader;
pub mod types;
pub mod writer;

mod config;
mod error;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use column_pipeline::{decode_data, ArrayValue, EncodedData, Encoder, EncoderChain, EncodingStep};
pub use config::{DecodeMode, WriterOptions};
pub use envelope::{
    EncodedCategory, EncodedColumn, EncodedDataBlock, EncodedFile, WIRE_FORMAT_VERSION,
};
pub use error::VolwireError;
pub use observability::init_logging;
pub use reader::{Category, Column, DataBlock, File};
pub use types::{DataType, ValuePresence};
pub use writer::{CategoryDescriptor, FieldDescriptor, FieldSource, Writer};
