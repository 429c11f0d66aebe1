//! Extraction configuration

use crate::error::Result;
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one extraction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Storage directory to read from
    pub storage_path: PathBuf,

    /// Directory extracted files are written to
    pub output_path: PathBuf,

    /// Client locale selecting regional file variants
    pub locale: Locale,

    /// Number of worker threads
    pub threads: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./Data"),
            output_path: PathBuf::from("./extracted"),
            locale: Locale::default(),
            threads: std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get),
        }
    }
}

impl ExtractConfig {
    /// Configuration reading from `storage_path`
    pub fn new<P: AsRef<Path>>(storage_path: P) -> Self {
        Self {
            storage_path: storage_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Load a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Set the storage directory
    #[must_use]
    pub fn with_storage_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the output directory
    #[must_use]
    pub fn with_output_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the locale
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the worker count; zero is raised to one
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_sets_fields() {
        let config = ExtractConfig::new("/data")
            .with_output_path("/out")
            .with_locale(Locale::DeDe)
            .with_threads(0);
        assert_eq!(config.storage_path, PathBuf::from("/data"));
        assert_eq!(config.output_path, PathBuf::from("/out"));
        assert_eq!(config.locale, Locale::DeDe);
        assert_eq!(config.threads, 1);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ExtractConfig =
            serde_json::from_str(r#"{ "locale": "frFR", "threads": 2 }"#).unwrap();
        assert_eq!(config.locale, Locale::FrFr);
        assert_eq!(config.threads, 2);
        assert_eq!(config.storage_path, ExtractConfig::default().storage_path);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wowex.json");
        let config = ExtractConfig::new("/srv/wow").with_threads(3);
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(ExtractConfig::from_file(&path).unwrap(), config);
    }
}
