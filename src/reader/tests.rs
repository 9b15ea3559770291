//! Reader-level tests: lazy/eager equivalence, container lookups, the
//! undefined-column sentinel, and decode failure reporting.

use super::*;
use crate::column_pipeline::{EncodedData, Encoder, EncoderChain, EncodingStep};
use crate::config::DecodeMode;
use crate::envelope::{EncodedCategory, EncodedColumn, EncodedDataBlock, EncodedFile};
use crate::error::VolwireError;
use crate::types::{DataType, ValuePresence};
use crate::writer::{CategoryDescriptor, FieldDescriptor, Writer};

struct LatticeChunk {
    labels: Vec<i32>,
    names: Vec<String>,
}

fn lattice_bytes() -> Vec<u8> {
    let descriptor = CategoryDescriptor::new("lattice", |c: &LatticeChunk| c.labels.len())
        .field(
            FieldDescriptor::int("label", |c: &LatticeChunk, i| c.labels[i]).with_encoding(
                EncoderChain::by(Encoder::RunLength).and(Encoder::IntegerPacking),
            ),
        )
        .field(FieldDescriptor::str("name", |c: &LatticeChunk, i| {
            c.names[i].clone()
        }));

    let data = LatticeChunk {
        labels: vec![0, 0, 0, 7, 7, 2],
        names: vec![
            "void".into(),
            "void".into(),
            "void".into(),
            "mito".into(),
            "mito".into(),
            "er".into(),
        ],
    };

    let mut writer = Writer::new();
    writer.start_data_block("lattice block").unwrap();
    writer
        .write_category(&descriptor, std::slice::from_ref(&data))
        .unwrap();
    writer.encode().unwrap();
    writer.into_bytes().unwrap()
}

fn read_all(file: &File) -> (Vec<i32>, Vec<String>) {
    let category = file.block_at(0).unwrap().category("lattice").unwrap();
    let labels = category.get_column("label").unwrap();
    let names = category.get_column("name").unwrap();
    (
        (0..category.row_count()).map(|i| labels.int(i)).collect(),
        (0..category.row_count()).map(|i| names.string(i)).collect(),
    )
}

#[test]
fn test_lazy_and_eager_modes_are_observably_identical() {
    let bytes = lattice_bytes();
    let lazy = File::parse(&bytes, DecodeMode::Lazy).unwrap();
    let eager = File::parse(&bytes, DecodeMode::Eager).unwrap();
    assert_eq!(read_all(&lazy), read_all(&eager));
}

#[test]
fn test_lazy_access_is_cached() {
    let bytes = lattice_bytes();
    let file = File::parse(&bytes, DecodeMode::Lazy).unwrap();
    let category = file.block_at(0).unwrap().category("lattice").unwrap();
    let first = category.get_column("label").unwrap();
    let second = category.get_column("label").unwrap();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_container_lookups() {
    let bytes = lattice_bytes();
    let file = File::parse(&bytes, DecodeMode::Lazy).unwrap();

    assert_eq!(file.block_count(), 1);
    assert!(file.block("LATTICEBLOCK").is_some());
    assert!(file.block("MISSING").is_none());

    let block = file.block_at(0).unwrap();
    assert_eq!(block.category_count(), 1);
    assert!(block.category("lattice").is_some());
    assert!(block.category("absent").is_none());
    assert!(std::ptr::eq(
        block.category_at(0).unwrap(),
        block.category("lattice").unwrap()
    ));

    let category = block.category("lattice").unwrap();
    assert_eq!(
        category.column_names().collect::<Vec<_>>(),
        vec!["label", "name"]
    );
}

#[test]
fn test_missing_column_yields_the_undefined_sentinel() {
    let bytes = lattice_bytes();
    let file = File::parse(&bytes, DecodeMode::Lazy).unwrap();
    let category = file.block_at(0).unwrap().category("lattice").unwrap();

    let column = category.get_column("comment").unwrap();
    assert!(column.is_undefined());
    assert_eq!(column.row_count(), 0);
    assert_eq!(column.string(0), "");
    assert_eq!(column.int(0), 0);
    assert_eq!(column.float(0), 0.0);
    assert_eq!(column.value_kind(0), ValuePresence::NotSpecified);
    assert_eq!(column.value_kind(99), ValuePresence::NotSpecified);
}

fn corrupt_column_envelope() -> Vec<u8> {
    // A RunLength column whose declared size cannot be satisfied.
    let column = EncodedColumn {
        name: "broken".to_string(),
        data: EncodedData {
            encoding: vec![
                EncodingStep::RunLength {
                    src_type: DataType::Int32,
                    src_size: 10,
                },
                EncodingStep::ByteArray {
                    array_type: DataType::Int32,
                },
            ],
            // One pair (value 1, run 2): expands to 2 values, 10 declared.
            data: vec![1, 0, 0, 0, 2, 0, 0, 0],
        },
        mask: None,
    };
    EncodedFile {
        version: "0.3.0".to_string(),
        encoder: "test".to_string(),
        data_blocks: vec![EncodedDataBlock {
            header: "B".to_string(),
            categories: vec![EncodedCategory {
                name: "cat".to_string(),
                row_count: 10,
                columns: vec![column],
            }],
        }],
    }
    .to_bytes()
    .unwrap()
}

#[test]
fn test_corrupt_column_fails_eager_parse() {
    let bytes = corrupt_column_envelope();
    assert!(matches!(
        File::parse(&bytes, DecodeMode::Eager),
        Err(VolwireError::Bounds(_))
    ));
}

#[test]
fn test_corrupt_column_fails_on_lazy_access_every_time() {
    let bytes = corrupt_column_envelope();
    let file = File::parse(&bytes, DecodeMode::Lazy).unwrap();
    let category = file.block_at(0).unwrap().category("cat").unwrap();
    for _ in 0..2 {
        assert!(matches!(
            category.get_column("broken"),
            Err(VolwireError::Bounds(_))
        ));
    }
}

#[test]
fn test_old_version_is_rejected_at_parse() {
    let mut envelope = EncodedFile::from_bytes(&lattice_bytes()).unwrap();
    envelope.version = "0.1.0".to_string();
    let bytes = rmp_serde::to_vec_named(&envelope).unwrap();
    assert!(matches!(
        File::parse(&bytes, DecodeMode::Lazy),
        Err(VolwireError::UnsupportedVersion(_))
    ));
}

#[test]
fn test_file_exposes_version_and_producer() {
    let bytes = lattice_bytes();
    let file = File::parse(&bytes, DecodeMode::Lazy).unwrap();
    assert_eq!(file.version(), "0.3.0");
    assert!(file.encoder_name().starts_with("volwire-core"));
}
