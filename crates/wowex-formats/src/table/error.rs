//! Error types for table decoding

use crate::bits::BitCursorError;
use thiserror::Error;

/// Errors raised while decoding a packed table
///
/// Everything except the typed-row conversion errors means the payload is
/// corrupt or was produced for a different schema version.
#[derive(Error, Debug)]
pub enum TableError {
    /// Payload shorter than the fixed header
    #[error("payload too short for table header: {0} bytes")]
    Truncated(usize),

    /// Header sizes do not add up to the payload length
    #[error("table length mismatch: header describes {expected} bytes, payload has {actual}")]
    LengthMismatch {
        /// Length implied by the header
        expected: u64,
        /// Actual payload length
        actual: u64,
    },

    /// Header column count disagrees with the schema
    #[error("field count mismatch: schema has {schema} columns, header declares {header}")]
    FieldCountMismatch {
        /// Columns declared by the schema
        schema: u32,
        /// Columns declared by the header
        header: u32,
    },

    /// Schema needs more bits than a record holds
    #[error("schema needs {schema_bits} bits per record, records are {record_bits} bits")]
    SchemaExceedsRecord {
        /// Bits per record required by the schema
        schema_bits: u64,
        /// Bits per record available
        record_bits: u64,
    },

    /// Schema itself is unusable
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Same record id decoded twice
    #[error("duplicate record id {0}")]
    DuplicateId(u32),

    /// String reference points outside the string block
    #[error("string offset {offset} outside string block of {size} bytes")]
    StringOutOfBounds {
        /// Offset from the record
        offset: u32,
        /// String block size
        size: usize,
    },

    /// String reference has no terminating NUL
    #[error("unterminated string at offset {0}")]
    UnterminatedString(u32),

    /// Typed row asked for a value of the wrong kind
    #[error("field {index} is not {expected}")]
    TypeMismatch {
        /// Field index within the record
        index: usize,
        /// Expected kind
        expected: &'static str,
    },

    /// Bit cursor failure
    #[error(transparent)]
    Bits(#[from] BitCursorError),

    /// `BinRW` parsing error
    #[error("binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Type alias for table decoding results
pub type Result<T> = std::result::Result<T, TableError>;
