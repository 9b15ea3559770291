// In: src/writer/mod.rs

//! The stateful write-side facade: accumulates data blocks and categories,
//! then finalizes them into the wire envelope.
//!
//! A `Writer` is built once, fed via `start_data_block`/`write_category`,
//! finalized with `encode`, and drained with `flush` or `into_bytes`. Every
//! call checks the lifecycle: writing after finalization, or into no open
//! block, is a caller bug reported as `WriterState`. One instance produces
//! one file; independent files want independent writers.

mod fields;

pub use fields::{CategoryDescriptor, FieldDescriptor, FieldSource};

use crate::column_pipeline::{ArrayValue, Encoder, EncoderChain};
use crate::config::WriterOptions;
use crate::envelope::{
    EncodedCategory, EncodedColumn, EncodedDataBlock, EncodedFile, WIRE_FORMAT_VERSION,
};
use crate::error::VolwireError;
use crate::types::ValuePresence;
use std::io::Write;

pub struct Writer {
    options: WriterOptions,
    blocks: Vec<EncodedDataBlock>,
    block_open: bool,
    encoded: Option<Vec<u8>>,
}

impl Writer {
    pub fn new() -> Self {
        Self::with_options(WriterOptions::default())
    }

    pub fn with_options(options: WriterOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
            block_open: false,
            encoded: None,
        }
    }

    /// Opens a new data block. The header is normalized to the canonical
    /// form: ASCII whitespace stripped, uppercased.
    pub fn start_data_block(&mut self, header: &str) -> Result<(), VolwireError> {
        self.ensure_writable("start_data_block")?;
        let normalized: String = header
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect::<String>()
            .to_uppercase();
        self.blocks.push(EncodedDataBlock {
            header: normalized,
            categories: Vec::new(),
        });
        self.block_open = true;
        Ok(())
    }

    /// Encodes one category from the given row contexts into the open block.
    ///
    /// The total row count is the sum over all contexts; a category with zero
    /// total rows is skipped entirely.
    pub fn write_category<C>(
        &mut self,
        descriptor: &CategoryDescriptor<C>,
        contexts: &[C],
    ) -> Result<(), VolwireError> {
        self.ensure_writable("write_category")?;
        if !self.block_open {
            return Err(VolwireError::WriterState(
                "write_category requires an open data block; call start_data_block first"
                    .to_string(),
            ));
        }

        let counts: Vec<usize> = contexts.iter().map(|c| (descriptor.row_count)(c)).collect();
        let total: usize = counts.iter().sum();
        if total == 0 {
            codec_metric!(
                "event" = "write_category",
                "outcome" = "skipped_empty",
                "category" = &descriptor.name
            );
            return Ok(());
        }

        let mut columns = Vec::with_capacity(descriptor.fields.len());
        for field in &descriptor.fields {
            columns.push(encode_field(field, contexts, &counts, total)?);
        }

        let block = self
            .blocks
            .last_mut()
            .ok_or_else(|| VolwireError::Internal("Open block flag with no block".into()))?;
        block.categories.push(EncodedCategory {
            name: descriptor.name.clone(),
            row_count: total as u32,
            columns,
        });
        Ok(())
    }

    /// Finalizes the writer: assembles and serializes the envelope. The
    /// writer accepts no further writes afterwards.
    pub fn encode(&mut self) -> Result<(), VolwireError> {
        self.ensure_writable("encode")?;
        let file = EncodedFile {
            version: WIRE_FORMAT_VERSION.to_string(),
            encoder: self.options.producer.clone(),
            data_blocks: std::mem::take(&mut self.blocks),
        };
        self.encoded = Some(file.to_bytes()?);
        self.block_open = false;
        Ok(())
    }

    /// Writes the finalized bytes into a sink.
    pub fn flush<W: Write>(&self, sink: &mut W) -> Result<(), VolwireError> {
        let bytes = self.finalized_bytes()?;
        sink.write_all(bytes)?;
        Ok(())
    }

    /// Consumes the writer, returning the finalized bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>, VolwireError> {
        self.encoded.ok_or_else(|| {
            VolwireError::WriterState("into_bytes called before encode".to_string())
        })
    }

    fn finalized_bytes(&self) -> Result<&[u8], VolwireError> {
        self.encoded
            .as_deref()
            .ok_or_else(|| VolwireError::WriterState("flush called before encode".to_string()))
    }

    fn ensure_writable(&self, operation: &str) -> Result<(), VolwireError> {
        if self.encoded.is_some() {
            return Err(VolwireError::WriterState(format!(
                "{} called on a finalized writer",
                operation
            )));
        }
        Ok(())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================
// Field Encoding
//==================================================================================

fn encode_field<C>(
    field: &FieldDescriptor<C>,
    contexts: &[C],
    counts: &[usize],
    total: usize,
) -> Result<EncodedColumn, VolwireError> {
    // One pass fills the flat backing array and, in parallel, the presence
    // codes for the same rows.
    let mut mask_codes: Vec<u8> = Vec::with_capacity(if field.presence.is_some() {
        total
    } else {
        0
    });
    let mut any_absent = false;
    let mut fill_presence = |ctx: &C, row: usize| {
        if let Some(presence) = &field.presence {
            let kind = presence(ctx, row);
            if kind != ValuePresence::Present {
                any_absent = true;
            }
            mask_codes.push(kind.code());
        }
    };

    let values = match &field.source {
        FieldSource::Int(get) => {
            let mut values = Vec::with_capacity(total);
            for (ctx, &count) in contexts.iter().zip(counts) {
                for row in 0..count {
                    values.push(get(ctx, row));
                    fill_presence(ctx, row);
                }
            }
            ArrayValue::Int32(values)
        }
        FieldSource::Float(get) => {
            let mut values = Vec::with_capacity(total);
            for (ctx, &count) in contexts.iter().zip(counts) {
                for row in 0..count {
                    values.push(get(ctx, row));
                    fill_presence(ctx, row);
                }
            }
            ArrayValue::Float64(values)
        }
        FieldSource::Str(get) => {
            let mut values = Vec::with_capacity(total);
            for (ctx, &count) in contexts.iter().zip(counts) {
                for row in 0..count {
                    values.push(get(ctx, row));
                    fill_presence(ctx, row);
                }
            }
            ArrayValue::Str(values)
        }
    };

    let chain = match &field.encoding {
        Some(chain) => chain.clone(),
        None => field.default_chain(),
    };
    let data = chain.encode(values)?;

    let mask = if any_absent {
        Some(encode_mask(&field.name, mask_codes)?)
    } else {
        None
    };

    Ok(EncodedColumn {
        name: field.name.clone(),
        data,
        mask,
    })
}

/// Encodes a presence mask, keeping the run-length form only when it is
/// strictly smaller than plain byte serialization.
fn encode_mask(
    field_name: &str,
    mask_codes: Vec<u8>,
) -> Result<crate::column_pipeline::EncodedData, VolwireError> {
    let plain = EncoderChain::by(Encoder::ByteArray).encode(ArrayValue::Uint8(mask_codes.clone()))?;
    let rle = EncoderChain::by(Encoder::RunLength)
        .and(Encoder::ByteArray)
        .encode(ArrayValue::Uint8(mask_codes))?;

    let (choice, mask) = if rle.data.len() < plain.data.len() {
        ("run_length", rle)
    } else {
        ("byte_array", plain)
    };
    codec_metric!(
        "event" = "encode_mask",
        "field" = field_name,
        "encoding" = choice,
        "bytes" = &mask.data.len()
    );
    Ok(mask)
}
