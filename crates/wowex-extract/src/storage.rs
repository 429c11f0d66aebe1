//! Archive payload retrieval
//!
//! The extraction pipeline only consumes bytes through [`ArchiveSource`].
//! [`LooseStorage`] is the bundled backend: an unpacked storage directory
//! with the root file at `<dir>/root` and content blobs at
//! `<dir>/data/<hh>/<hh>/<content key hex>`.

use crate::error::{Result, StorageError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use wowex_formats::{LocaleFlags, RootEntry, RootIndex};
use wowex_hash::ContentKey;

/// Source of archive file contents
pub trait ArchiveSource {
    /// Bytes of the file at `path` for `locale`, `None` when no entry matches
    fn read_file(&self, path: &str, locale: LocaleFlags) -> Option<Vec<u8>>;
}

impl<S: ArchiveSource + ?Sized> ArchiveSource for &S {
    fn read_file(&self, path: &str, locale: LocaleFlags) -> Option<Vec<u8>> {
        (**self).read_file(path, locale)
    }
}

/// Unpacked storage directory
#[derive(Debug)]
pub struct LooseStorage {
    base_path: PathBuf,
    root: RootIndex,
}

impl LooseStorage {
    /// Open a storage directory and parse its root file
    pub fn open<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        let root_path = base_path.join("root");
        if !root_path.is_file() {
            return Err(StorageError::MissingRoot(base_path.display().to_string()));
        }

        let data = std::fs::read(&root_path)?;
        let root = RootIndex::parse(&data)?;
        info!(
            "Opened storage {} ({} root entries)",
            base_path.display(),
            root.len()
        );
        Ok(Self { base_path, root })
    }

    /// Storage directory
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Parsed root index
    pub const fn root(&self) -> &RootIndex {
        &self.root
    }

    /// Location of a content blob
    pub fn content_path(&self, key: &ContentKey) -> PathBuf {
        let hex = key.to_hex();
        self.base_path
            .join("data")
            .join(&hex[0..2])
            .join(&hex[2..4])
            .join(hex)
    }

    fn read_entry(&self, entry: &RootEntry) -> Option<Vec<u8>> {
        let path = self.content_path(&entry.content_key);
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Missing content blob {}: {}", entry.content_key, e);
                return None;
            }
        };
        if !entry.content_key.verify(&data) {
            warn!(
                "Content blob {} failed verification (FileDataID {})",
                entry.content_key, entry.file_data_id
            );
            return None;
        }
        Some(data)
    }

    /// Bytes of a file by FileDataID
    pub fn read_file_data_id(&self, file_data_id: u32, locale: LocaleFlags) -> Option<Vec<u8>> {
        match self.root.lookup_file_data_id(file_data_id, locale) {
            Ok(entry) => self.read_entry(entry),
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }
}

impl ArchiveSource for LooseStorage {
    fn read_file(&self, path: &str, locale: LocaleFlags) -> Option<Vec<u8>> {
        match self.root.lookup(path, locale) {
            Ok(entry) => self.read_entry(entry),
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }
}
