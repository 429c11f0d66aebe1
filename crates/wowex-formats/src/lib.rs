//! Parsers for the data formats stored inside CASC archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Intentional for sign extension
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::float_cmp)] // Bit-exact float round trips in tests
//! This crate provides the decode side of the extraction pipeline:
//!
//! - **Bits**: a bit-granular cursor for packed record fields
//! - **Root**: the locale-aware root index that maps paths and FileDataIDs
//!   to content keys
//! - **Table**: the schema-driven decoder for `WDBC` client tables
//!
//! # Design Principles
//!
//! - **Fail fast on malformed input**: header and length inconsistencies abort
//!   the decode instead of producing partial records
//! - **Schemas are data**: the decoder is generic over an ordered field list,
//!   specific tables only describe their layout
//! - **Explicit reinterpretation**: raw bits become floats or signed integers
//!   only when the schema says so

#![warn(missing_docs)]

pub mod bits;
pub mod root;
pub mod table;

pub use bits::{BitCursor, BitCursorError, RawValue};
pub use root::{ContentFlags, LocaleFlags, RootEntry, RootError, RootIndex, RootIndexBuilder};
pub use table::{
    DecodedTable, FieldDef, FieldKind, FieldValue, MapRow, TableError, TableRecord, TableRow,
    TableSchema, decode_rows, decode_table,
};
