//! Locale-aware root index
//!
//! The root index is the first hop of every archive read: it maps a logical
//! path (through its lookup3 name hash) or a FileDataID to the content key of
//! the payload. A path can have several entries that differ only in their
//! locale mask, one per regional variant of the file.
//!
//! ```
//! use wowex_formats::root::{LocaleFlags, RootEntry, RootIndex};
//! use wowex_hash::{ContentKey, hash_path};
//!
//! let hash = hash_path("Fonts/FRIZQT__.TTF");
//! let mut builder = RootIndex::builder();
//! builder
//!     .push(RootEntry::named(1, ContentKey::from_bytes([1; 16]), hash, LocaleFlags::ENUS))
//!     .push(RootEntry::named(2, ContentKey::from_bytes([2; 16]), hash, LocaleFlags::RURU));
//! let index = builder.build();
//!
//! let entry = index.lookup("fonts\\frizqt__.ttf", LocaleFlags::RURU).unwrap();
//! assert_eq!(entry.file_data_id, 2);
//! assert!(index.lookup("Fonts/FRIZQT__.TTF", LocaleFlags::FRFR).is_err());
//! ```

pub mod entry;
pub mod error;
pub mod file;
pub mod flags;
pub mod index;

pub use entry::RootEntry;
pub use error::{Result, RootError};
pub use file::{BlockHeader, ManifestHeader, RootLayout};
pub use flags::{ContentFlags, LocaleFlags};
pub use index::{RootIndex, RootIndexBuilder};
