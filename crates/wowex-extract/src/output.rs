//! Output file writer

use crate::error::{Result, StorageError};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Writes extracted files below an output directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    /// Writer rooted at `root`; the directory is created on first write
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path for an archive path
    ///
    /// Backslashes become separators. Absolute paths and `..` are rejected.
    pub fn target_path(&self, archive_path: &str) -> Result<PathBuf> {
        let relative = PathBuf::from(archive_path.replace('\\', "/"));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe || relative.as_os_str().is_empty() {
            return Err(StorageError::UnsafePath(archive_path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Write `data` for `archive_path`, creating parent directories
    pub fn write(&self, archive_path: &str, data: &[u8]) -> Result<PathBuf> {
        let target = self.target_path(archive_path)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, data)?;
        debug!("Wrote {} ({} bytes)", target.display(), data.len());
        Ok(target)
    }
}
