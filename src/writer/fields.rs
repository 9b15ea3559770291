// In: src/writer/fields.rs

//! Field and category descriptors: the contract between the codec and the
//! layers that own the actual domain data.
//!
//! A caller describes each category once: its name, how many rows a row
//! context contributes, and how to extract each field's value (and presence)
//! for one row. The writer then drives the extraction; the descriptors never
//! see the envelope.

use crate::column_pipeline::{Encoder, EncoderChain};
use crate::types::ValuePresence;

/// How one field's value is extracted from a row context.
pub enum FieldSource<C> {
    Int(Box<dyn Fn(&C, usize) -> i32>),
    Float(Box<dyn Fn(&C, usize) -> f64>),
    Str(Box<dyn Fn(&C, usize) -> String>),
}

/// One column-to-be: name, extraction, optional presence, optional chain.
pub struct FieldDescriptor<C> {
    pub(crate) name: String,
    pub(crate) source: FieldSource<C>,
    pub(crate) presence: Option<Box<dyn Fn(&C, usize) -> ValuePresence>>,
    pub(crate) encoding: Option<EncoderChain>,
}

impl<C> FieldDescriptor<C> {
    pub fn int(name: impl Into<String>, value: impl Fn(&C, usize) -> i32 + 'static) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Int(Box::new(value)),
            presence: None,
            encoding: None,
        }
    }

    pub fn float(name: impl Into<String>, value: impl Fn(&C, usize) -> f64 + 'static) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Float(Box::new(value)),
            presence: None,
            encoding: None,
        }
    }

    pub fn str(name: impl Into<String>, value: impl Fn(&C, usize) -> String + 'static) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Str(Box::new(value)),
            presence: None,
            encoding: None,
        }
    }

    /// Attaches a per-row presence callback. Fields without one are treated
    /// as present in every row and never produce a mask.
    pub fn with_presence(
        mut self,
        presence: impl Fn(&C, usize) -> ValuePresence + 'static,
    ) -> Self {
        self.presence = Some(Box::new(presence));
        self
    }

    /// Overrides the default encoder chain for this field.
    pub fn with_encoding(mut self, chain: EncoderChain) -> Self {
        self.encoding = Some(chain);
        self
    }

    /// The chain used when the caller did not pick one: plain byte
    /// serialization for numbers, the string pool transform for strings.
    pub(crate) fn default_chain(&self) -> EncoderChain {
        match self.source {
            FieldSource::Int(_) | FieldSource::Float(_) => EncoderChain::by(Encoder::ByteArray),
            FieldSource::Str(_) => EncoderChain::by(Encoder::StringArray),
        }
    }
}

/// One table-to-be: name, per-context row count, and its fields.
pub struct CategoryDescriptor<C> {
    pub(crate) name: String,
    pub(crate) row_count: Box<dyn Fn(&C) -> usize>,
    pub(crate) fields: Vec<FieldDescriptor<C>>,
}

impl<C> CategoryDescriptor<C> {
    pub fn new(name: impl Into<String>, row_count: impl Fn(&C) -> usize + 'static) -> Self {
        Self {
            name: name.into(),
            row_count: Box::new(row_count),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor<C>) -> Self {
        self.fields.push(field);
        self
    }
}
