// In: src/reader/mod.rs

//! The read-side containers: a parsed `File` holds data blocks, blocks hold
//! categories, categories hold columns.
//!
//! Parsing deserializes and version-gates the envelope only. Column payloads
//! decode either eagerly at parse time or lazily on first access with
//! caching, depending on `DecodeMode`; the two are observably identical.
//! Everything here is read-only after construction, so concurrent access
//! needs no locking beyond the per-column decode cache.

mod column;

pub use column::Column;

use crate::config::DecodeMode;
use crate::envelope::{EncodedCategory, EncodedColumn, EncodedDataBlock, EncodedFile};
use crate::error::VolwireError;
use std::collections::HashMap;
use std::sync::OnceLock;

//==================================================================================
// File
//==================================================================================

pub struct File {
    version: String,
    encoder: String,
    blocks: Vec<DataBlock>,
}

impl File {
    /// Parses an envelope. `DecodeMode::Eager` decodes every column now;
    /// `DecodeMode::Lazy` defers each column to its first access.
    pub fn parse(bytes: &[u8], mode: DecodeMode) -> Result<Self, VolwireError> {
        let envelope = EncodedFile::from_bytes(bytes)?;
        let blocks = envelope
            .data_blocks
            .into_iter()
            .map(|block| DataBlock::from_encoded(block, mode))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            version: envelope.version,
            encoder: envelope.encoder,
            blocks,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The producer name recorded by the writing side.
    pub fn encoder_name(&self) -> &str {
        &self.encoder
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_at(&self, index: usize) -> Option<&DataBlock> {
        self.blocks.get(index)
    }

    /// Looks a block up by its (already normalized) header.
    pub fn block(&self, header: &str) -> Option<&DataBlock> {
        self.blocks.iter().find(|b| b.header == header)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &DataBlock> {
        self.blocks.iter()
    }
}

//==================================================================================
// Data Block
//==================================================================================

pub struct DataBlock {
    header: String,
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl DataBlock {
    fn from_encoded(encoded: EncodedDataBlock, mode: DecodeMode) -> Result<Self, VolwireError> {
        let categories = encoded
            .categories
            .into_iter()
            .map(|category| Category::from_encoded(category, mode))
            .collect::<Result<Vec<_>, _>>()?;
        let index = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Ok(Self {
            header: encoded.header,
            categories,
            index,
        })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.index.get(name).map(|&i| &self.categories[i])
    }

    pub fn category_at(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }
}

//==================================================================================
// Category
//==================================================================================

pub struct Category {
    name: String,
    row_count: usize,
    slots: Vec<ColumnSlot>,
    index: HashMap<String, usize>,
}

impl Category {
    fn from_encoded(encoded: EncodedCategory, mode: DecodeMode) -> Result<Self, VolwireError> {
        let slots: Vec<ColumnSlot> = encoded.columns.into_iter().map(ColumnSlot::new).collect();
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.encoded.name.clone(), i))
            .collect();
        let category = Self {
            name: encoded.name,
            row_count: encoded.row_count as usize,
            slots,
            index,
        };
        if matches!(mode, DecodeMode::Eager) {
            for slot in &category.slots {
                slot.get(&category.name, category.row_count)?;
            }
        }
        Ok(category)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.slots.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.encoded.name.as_str())
    }

    /// Returns the decoded column, or the shared undefined sentinel when the
    /// category has no column of this name. A missing optional field is not
    /// an error; a column that fails to decode is.
    pub fn get_column(&self, name: &str) -> Result<&Column, VolwireError> {
        match self.index.get(name) {
            None => Ok(Column::undefined()),
            Some(&i) => self.slots[i].get(&self.name, self.row_count),
        }
    }
}

//==================================================================================
// Column Slot (decode-once cache)
//==================================================================================

struct ColumnSlot {
    encoded: EncodedColumn,
    decoded: OnceLock<Column>,
}

impl ColumnSlot {
    fn new(encoded: EncodedColumn) -> Self {
        Self {
            encoded,
            decoded: OnceLock::new(),
        }
    }

    fn get(&self, category_name: &str, expected_rows: usize) -> Result<&Column, VolwireError> {
        if let Some(column) = self.decoded.get() {
            return Ok(column);
        }
        // Failed decodes are not cached; every access re-reports the error.
        let column = column::decode_column(&self.encoded)?;
        if column.row_count() != expected_rows {
            return Err(VolwireError::Bounds(format!(
                "Column '{}' of category '{}' decoded to {} rows, {} declared",
                self.encoded.name,
                category_name,
                column.row_count(),
                expected_rows
            )));
        }
        codec_metric!(
            "event" = "decode_column",
            "category" = category_name,
            "column" = &self.encoded.name,
            "rows" = &column.row_count()
        );
        Ok(self.decoded.get_or_init(|| column))
    }
}

#[cfg(test)]
mod tests;
