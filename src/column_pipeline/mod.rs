// In: src/column_pipeline/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Column Pipeline
// ====================================================================================
//
// The `column_pipeline` is the transform engine of the codec. It knows nothing
// about categories, masks, or the envelope; it turns one array into one
// `EncodedData` pair and back.
//
// Data Flow (Encode):
//
//   1. [Writer]                    -> builds a flat `ArrayValue` per field
//         |
//         `-> 2. [EncoderChain::encode] -> applies each `Encoder` in order,
//                collecting the `EncodingStep`s they record
//         |
//         `-> 3. `EncodedData { encoding, data }` -> handed to the envelope
//
// Data Flow (Decode):
//
//   1. [Reader]                    -> pulls an `EncodedData` out of the envelope
//         |
//         `-> 2. [decode_data]     -> walks `encoding` last-to-first, inverting
//                each step via the matching kernel
//         |
//         `-> 3. typed `ArrayValue` -> wrapped into a `Column` by the reader
//
// ====================================================================================

pub mod decoder;
pub mod encoder;
pub mod models;

pub use decoder::decode_data;
pub use encoder::{Encoder, EncoderChain};
pub use models::{ArrayValue, EncodedData, EncodingStep};

#[cfg(test)]
mod roundtrip_tests;
