//! Error types for root index parsing and lookup

use crate::root::flags::LocaleFlags;
use thiserror::Error;

/// Errors raised while parsing or querying a root index
#[derive(Error, Debug)]
pub enum RootError {
    /// Path is not present in the index at all
    #[error("unknown path: {path}")]
    UnknownPath {
        /// Path (or hash rendering) that was looked up
        path: String,
    },

    /// FileDataID is not present in the index at all
    #[error("unknown FileDataID: {0}")]
    UnknownFileDataId(u32),

    /// Entries exist, but none for the requested locale
    #[error("file not present for locale {locale}: {path}")]
    NotForLocale {
        /// Path (or id rendering) that was looked up
        path: String,
        /// Requested locale mask
        locale: LocaleFlags,
    },

    /// Block claims more records than the remaining data can hold
    #[error("truncated root block at offset {offset}: {records} records need {needed} bytes, {available} left")]
    TruncatedBlock {
        /// Byte offset of the block header
        offset: u64,
        /// Declared record count
        records: u32,
        /// Bytes the records require
        needed: u64,
        /// Bytes remaining in the file
        available: u64,
    },

    /// FileDataID delta sequence leaves the u32 range
    #[error("invalid FileDataID delta {delta} after id {previous}")]
    InvalidDelta {
        /// Previous id (-1 before the first record)
        previous: i64,
        /// Offending delta
        delta: i32,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `BinRW` parsing error
    #[error("binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl RootError {
    /// True for the recoverable lookup misses
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownPath { .. } | Self::UnknownFileDataId(_) | Self::NotForLocale { .. }
        )
    }
}

/// Type alias for root index results
pub type Result<T> = std::result::Result<T, RootError>;
