//! Root index records

use crate::root::flags::{ContentFlags, LocaleFlags};
use wowex_hash::ContentKey;

/// One storage-index record
///
/// Several entries may share a path and differ only in their locale mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootEntry {
    /// File data identifier
    pub file_data_id: u32,
    /// Integrity digest of the payload, also the key into the content store
    pub content_key: ContentKey,
    /// Lookup3 hash of the normalized path, absent for unnamed files
    pub name_hash: Option<u64>,
    /// Locales this entry applies to
    pub locale: LocaleFlags,
    /// Flags of the block the entry came from
    pub content: ContentFlags,
}

impl RootEntry {
    /// Create an entry for a named file
    pub fn named(
        file_data_id: u32,
        content_key: ContentKey,
        name_hash: u64,
        locale: LocaleFlags,
    ) -> Self {
        Self {
            file_data_id,
            content_key,
            name_hash: Some(name_hash),
            locale,
            content: ContentFlags::default(),
        }
    }

    /// Check if entry applies to any locale in `locale`
    pub const fn matches_locale(&self, locale: LocaleFlags) -> bool {
        self.locale.intersects(locale)
    }
}
