//! This module defines the core, strongly-typed data representations used
//! throughout the volwire codec.
//!
//! It includes the canonical `DataType` registry, which replaces fragile
//! integer-code juggling with a safe, serializable enum, and the per-row
//! `ValuePresence` codes attached to masked columns.

pub mod data_type;
pub mod presence;

// Re-export the main types for easier access.
pub use data_type::DataType;
pub use presence::ValuePresence;
