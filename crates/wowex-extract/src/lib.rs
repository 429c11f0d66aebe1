//! Extraction pipeline for CASC-hosted game data
//!
//! Ties the decoders together into a tool that pulls files out of a storage
//! directory in parallel:
//!
//! - [`WorkQueue`]: blocking FIFO feeding the worker threads
//! - [`ArchiveSource`] / [`LooseStorage`]: where file bytes come from
//! - [`OutputWriter`]: where they go
//! - [`Extractor`]: the worker pool itself
//! - [`Locale`]: client locales and their archive locale masks
//!
//! The `wowex` binary in this crate exposes the pipeline, the table decoder
//! and the geometry manager on the command line.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod extract;
pub mod locale;
pub mod output;
pub mod queue;
pub mod storage;

pub use config::ExtractConfig;
pub use error::{Result, StorageError};
pub use extract::{ExtractReport, Extractor};
pub use locale::Locale;
pub use output::OutputWriter;
pub use queue::WorkQueue;
pub use storage::{ArchiveSource, LooseStorage};
