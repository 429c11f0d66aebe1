//! Error types for storage access and extraction

use thiserror::Error;
use wowex_formats::RootError;

/// Errors raised by storage backends, output and configuration
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage directory lacks its root file
    #[error("no root file in storage directory {0}")]
    MissingRoot(String),

    /// Root file could not be parsed
    #[error("root index error: {0}")]
    Root(#[from] RootError),

    /// Locale name not recognized
    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    /// Output path would leave the output directory
    #[error("refusing to write outside the output directory: {0}")]
    UnsafePath(String),

    /// Configuration file could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for storage results
pub type Result<T> = std::result::Result<T, StorageError>;
