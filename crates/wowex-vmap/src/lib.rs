//! Collision geometry for extracted maps
//!
//! This crate provides the geometry side of the extraction pipeline:
//!
//! - **Format**: `.vmtree`, `.vmtile` and `.vmo` readers and writers
//! - **Model cache**: world models shared across tiles by reference count
//! - **Tree**: per-map tile state with balanced load counts
//! - **Manager**: [`VMapManager`], loading a map tile together with the same
//!   tile of every child map
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use wowex_vmap::{LoadResult, MapRelations, VMapManager};
//!
//! let manager = VMapManager::new(MapRelations::from_pairs([(609, 0)]));
//! match manager.load_map(Path::new("vmaps"), 0, 32, 48) {
//!     LoadResult::Success => println!("loaded"),
//!     LoadResult::Ignored => println!("no geometry"),
//!     LoadResult::Error => println!("partially loaded"),
//! }
//! manager.unload_map(0, 32, 48);
//! ```

#![warn(missing_docs)]
#![allow(clippy::cast_possible_truncation)] // Counts are bounded by u32 file fields
#![allow(clippy::float_cmp)] // Exact round trips in tests

pub mod error;
pub mod format;
pub mod manager;
pub mod model_cache;
pub mod relations;
pub mod tree;

pub use error::{Result, VmapError};
pub use format::{
    BoundingBox, MapTreeFile, ModelGroup, ModelSpawn, TileCoord, TileFile, Vec3, VmapFormat,
    WorldModel,
};
pub use manager::{LoadResult, VMapManager};
pub use model_cache::ModelCache;
pub use relations::MapRelations;
pub use tree::{PlacedModel, StaticMapTree};
