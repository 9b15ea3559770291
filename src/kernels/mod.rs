//! Pure, stateless transform kernels.
//!
//! Each module implements one reversible transform as a matched
//! `encode`/`decode` pair of free functions, with no knowledge of chains,
//! steps, or the wire envelope. The `column_pipeline` layer owns dispatch,
//! step bookkeeping, and type flow; the kernels own only the arithmetic.

pub mod byte_array;
pub mod delta;
pub mod fixed_point;
pub mod integer_packing;
pub mod interval_quant;
pub mod run_length;
pub mod string_pool;
