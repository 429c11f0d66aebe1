//! Locale-aware lookup over root entries

use crate::root::entry::RootEntry;
use crate::root::error::{Result, RootError};
use crate::root::flags::LocaleFlags;
use std::collections::HashMap;
use wowex_hash::hash_path;

/// Immutable index from name hash / FileDataID to root entries
#[derive(Debug, Default)]
pub struct RootIndex {
    entries: Vec<RootEntry>,
    by_name: HashMap<u64, Vec<usize>>,
    by_file_data_id: HashMap<u32, Vec<usize>>,
}

impl RootIndex {
    /// Start building an index
    pub fn builder() -> RootIndexBuilder {
        RootIndexBuilder::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct name hashes
    pub fn named_count(&self) -> usize {
        self.by_name.len()
    }

    /// All entries in load order
    pub fn entries(&self) -> &[RootEntry] {
        &self.entries
    }

    /// Resolve a path for a locale
    ///
    /// The path is normalized before hashing. Returns the first entry in
    /// load order whose locale mask intersects `locale`.
    ///
    /// # Errors
    ///
    /// [`RootError::UnknownPath`] when the path has no entries at all,
    /// [`RootError::NotForLocale`] when none of them covers `locale`.
    pub fn lookup(&self, path: &str, locale: LocaleFlags) -> Result<&RootEntry> {
        self.find(self.by_name.get(&hash_path(path)), locale, || path.to_string())
    }

    /// Resolve a precomputed name hash for a locale
    pub fn lookup_hash(&self, name_hash: u64, locale: LocaleFlags) -> Result<&RootEntry> {
        self.find(self.by_name.get(&name_hash), locale, || {
            format!("{name_hash:016x}")
        })
    }

    /// Resolve a FileDataID for a locale
    pub fn lookup_file_data_id(&self, file_data_id: u32, locale: LocaleFlags) -> Result<&RootEntry> {
        let Some(candidates) = self.by_file_data_id.get(&file_data_id) else {
            return Err(RootError::UnknownFileDataId(file_data_id));
        };
        self.find(Some(candidates), locale, || {
            format!("FileDataID {file_data_id}")
        })
    }

    /// Every entry recorded for a path, regardless of locale
    pub fn entries_for_path(&self, path: &str) -> impl Iterator<Item = &RootEntry> + '_ {
        self.by_name
            .get(&hash_path(path))
            .into_iter()
            .flatten()
            .map(|&index| &self.entries[index])
    }

    fn find<F>(&self, candidates: Option<&Vec<usize>>, locale: LocaleFlags, describe: F) -> Result<&RootEntry>
    where
        F: FnOnce() -> String,
    {
        let Some(candidates) = candidates else {
            return Err(RootError::UnknownPath { path: describe() });
        };

        candidates
            .iter()
            .map(|&index| &self.entries[index])
            .find(|entry| entry.matches_locale(locale))
            .ok_or_else(|| RootError::NotForLocale {
                path: describe(),
                locale,
            })
    }
}

/// Accumulates entries before freezing them into a [`RootIndex`]
#[derive(Debug, Default)]
pub struct RootIndexBuilder {
    entries: Vec<RootEntry>,
}

impl RootIndexBuilder {
    /// Reserve room for `additional` entries
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// Add an entry
    pub fn push(&mut self, entry: RootEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Freeze into an immutable index
    pub fn build(self) -> RootIndex {
        let mut by_name: HashMap<u64, Vec<usize>> = HashMap::new();
        let mut by_file_data_id: HashMap<u32, Vec<usize>> = HashMap::new();

        for (index, entry) in self.entries.iter().enumerate() {
            if let Some(hash) = entry.name_hash {
                by_name.entry(hash).or_default().push(index);
            }
            by_file_data_id
                .entry(entry.file_data_id)
                .or_default()
                .push(index);
        }

        RootIndex {
            entries: self.entries,
            by_name,
            by_file_data_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use wowex_hash::ContentKey;

    fn key(byte: u8) -> ContentKey {
        ContentKey::from_bytes([byte; 16])
    }

    fn sample_index() -> RootIndex {
        let hash = hash_path("Interface/FrameXML/Localization.lua");
        let mut builder = RootIndex::builder();
        builder
            .push(RootEntry::named(
                10,
                key(1),
                hash,
                LocaleFlags::ENUS | LocaleFlags::ENGB,
            ))
            .push(RootEntry::named(11, key(2), hash, LocaleFlags::KOKR));
        builder.build()
    }

    #[test]
    fn test_lookup_picks_entry_for_locale() {
        let index = sample_index();
        let path = "Interface/FrameXML/Localization.lua";

        let korean = index.lookup(path, LocaleFlags::KOKR).unwrap();
        assert_eq!(korean.content_key, key(2));

        let english = index.lookup(path, LocaleFlags::ENUS).unwrap();
        assert_eq!(english.content_key, key(1));
    }

    #[test]
    fn test_lookup_normalizes_path() {
        let index = sample_index();
        let entry = index
            .lookup("INTERFACE\\framexml\\localization.LUA", LocaleFlags::ENGB)
            .unwrap();
        assert_eq!(entry.file_data_id, 10);
    }

    #[test]
    fn test_lookup_missing_locale() {
        let index = sample_index();
        let err = index
            .lookup("Interface/FrameXML/Localization.lua", LocaleFlags::FRFR)
            .unwrap_err();
        assert!(matches!(err, RootError::NotForLocale { locale, .. } if locale == LocaleFlags::FRFR));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_lookup_unknown_path() {
        let index = sample_index();
        let err = index.lookup("Interface/Missing.lua", LocaleFlags::ENUS).unwrap_err();
        assert!(matches!(err, RootError::UnknownPath { ref path } if path == "Interface/Missing.lua"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_lookup_by_file_data_id() {
        let index = sample_index();
        assert_eq!(
            index.lookup_file_data_id(11, LocaleFlags::KOKR).unwrap().content_key,
            key(2)
        );
        assert!(matches!(
            index.lookup_file_data_id(11, LocaleFlags::ENUS),
            Err(RootError::NotForLocale { .. })
        ));
        assert!(matches!(
            index.lookup_file_data_id(99, LocaleFlags::ENUS),
            Err(RootError::UnknownFileDataId(99))
        ));
    }

    #[test]
    fn test_entries_for_path() {
        let index = sample_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.named_count(), 1);
        assert_eq!(
            index
                .entries_for_path("Interface/FrameXML/Localization.lua")
                .count(),
            2
        );
        assert_eq!(index.entries_for_path("nope").count(), 0);
    }
}
