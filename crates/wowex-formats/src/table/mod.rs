//! Packed client table decoding
//!
//! A table payload is a fixed header, a region of equally sized records and
//! a trailing block of NUL-terminated strings. The decoder is generic over a
//! [`TableSchema`]: an ordered list of fields, each with a bit width and an
//! interpretation. Fields are read with a [`BitCursor`](crate::bits::BitCursor),
//! so bit-packed layouts work the same as plain 32-bit columns.
//!
//! ```
//! use wowex_formats::table::{FieldDef, TableSchema, decode_table};
//!
//! let schema = TableSchema::new("Tiny", vec![FieldDef::uint("ID", 16), FieldDef::uint("Value", 16)]);
//!
//! let mut payload = b"WDBC".to_vec();
//! for v in [1u32, 2, 4, 0] {
//!     payload.extend_from_slice(&v.to_le_bytes());
//! }
//! payload.extend_from_slice(&[0x05, 0x00, 0x2a, 0x00]);
//!
//! let table = decode_table(&payload, &schema).unwrap();
//! assert_eq!(table.value(5, "Value").and_then(|v| v.as_u64()), Some(42));
//! ```

mod decoder;
mod error;
mod header;
mod row;
mod schema;
mod value;

pub use decoder::decode_table;
pub use error::{Result, TableError};
pub use header::TableHeader;
pub use row::{MapRow, TableRow, decode_rows};
pub use schema::{FieldDef, FieldKind, TableSchema};
pub use value::{DecodedTable, FieldValue, TableRecord};
