//! Content hashing for CASC archive lookups
//!
//! This crate provides the two hashes every archive lookup depends on:
//!
//! - **Lookup3**: Bob Jenkins' 64-bit name hash, used to derive root index
//!   keys from normalized file paths
//! - **MD5**: content keys, used to verify the integrity of retrieved payloads
//!
//! # Examples
//!
//! ```
//! use wowex_hash::{hash_path, lookup3};
//!
//! // Paths are normalized before hashing, so these collide on purpose
//! assert_eq!(
//!     hash_path("World/Maps/Azeroth/Azeroth.wdt"),
//!     hash_path("WORLD\\MAPS\\AZEROTH\\AZEROTH.WDT"),
//! );
//!
//! assert_eq!(lookup3::hash64(b""), 0xdead_beef_dead_beef);
//! ```

#![warn(missing_docs)]

pub mod content_key;
pub mod lookup3;

pub use content_key::ContentKey;
pub use lookup3::{hash_path, hash64, normalize_path};
