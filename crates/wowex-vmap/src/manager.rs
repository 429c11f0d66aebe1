//! Spatial resource manager
//!
//! Owns the per-map trees, the shared model cache and the parent/child map
//! relation. Trees are created lazily on the first tile load of a map and
//! dropped again once their last tile is unloaded.
//!
//! Lock order is always trees before models.

use crate::format::WorldModel;
use crate::model_cache::ModelCache;
use crate::relations::MapRelations;
use crate::tree::StaticMapTree;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of a tile load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadResult {
    /// Map tile and every child tile loaded
    Success,
    /// The map tile failed, or it loaded but a child tile failed
    Error,
    /// The map has no geometry data
    Ignored,
}

impl fmt::Display for LoadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Ignored => "ignored",
        };
        f.write_str(s)
    }
}

/// Loads and unloads collision geometry per map tile
pub struct VMapManager {
    relations: MapRelations,
    models: ModelCache,
    trees: Mutex<HashMap<u32, StaticMapTree>>,
}

impl VMapManager {
    /// Create a manager with a fixed map relation
    pub fn new(relations: MapRelations) -> Self {
        Self {
            relations,
            models: ModelCache::new(),
            trees: Mutex::new(HashMap::new()),
        }
    }

    /// Load a tile of a map and the same tile of every child map
    ///
    /// A child failure reports [`LoadResult::Error`] while the parent tile
    /// stays loaded. Children without geometry do not count as failures.
    pub fn load_map(&self, base_path: &Path, map_id: u32, x: u32, y: u32) -> LoadResult {
        let mut trees = self.trees.lock();
        let mut result = self.load_single(&mut trees, base_path, map_id, x, y);

        if result == LoadResult::Success {
            for &child in self.relations.children(map_id) {
                if self.load_single(&mut trees, base_path, child, x, y) == LoadResult::Error {
                    warn!(
                        "Map {} tile {},{} loaded but child map {} failed",
                        map_id, x, y, child
                    );
                    result = LoadResult::Error;
                }
            }
        }
        result
    }

    fn load_single(
        &self,
        trees: &mut HashMap<u32, StaticMapTree>,
        base_path: &Path,
        map_id: u32,
        x: u32,
        y: u32,
    ) -> LoadResult {
        if !trees.contains_key(&map_id) {
            match StaticMapTree::open(base_path, map_id) {
                Ok(Some(tree)) => {
                    info!("Registered geometry tree for map {}", map_id);
                    trees.insert(map_id, tree);
                }
                Ok(None) => return LoadResult::Ignored,
                Err(e) => {
                    error!("Failed to open tree for map {}: {}", map_id, e);
                    return LoadResult::Error;
                }
            }
        }

        let Some(tree) = trees.get_mut(&map_id) else {
            return LoadResult::Error;
        };
        let loaded = tree.load_tile(x, y, &self.models);
        let evict = tree.loaded_tile_count() == 0;

        match loaded {
            Ok(()) => LoadResult::Success,
            Err(e) => {
                error!("Failed to load map {} tile {},{}: {}", map_id, x, y, e);
                if evict {
                    trees.remove(&map_id);
                }
                LoadResult::Error
            }
        }
    }

    /// Unload a tile of every child map, then of the map itself
    pub fn unload_map(&self, map_id: u32, x: u32, y: u32) {
        let mut trees = self.trees.lock();
        for &child in self.relations.children(map_id) {
            self.unload_single(&mut trees, child, x, y);
        }
        self.unload_single(&mut trees, map_id, x, y);
    }

    fn unload_single(&self, trees: &mut HashMap<u32, StaticMapTree>, map_id: u32, x: u32, y: u32) {
        let Some(tree) = trees.get_mut(&map_id) else {
            debug!("Unload of map {} which has no loaded tiles", map_id);
            return;
        };
        tree.unload_tile(x, y, &self.models);
        if tree.loaded_tile_count() == 0 {
            trees.remove(&map_id);
            debug!("Evicted geometry tree for map {}", map_id);
        }
    }

    /// Unload every tile of every map
    pub fn unload_all(&self) {
        let mut trees = self.trees.lock();
        for (_, mut tree) in trees.drain() {
            tree.unload_all(&self.models);
        }
    }

    /// Get a model through the shared cache
    pub fn acquire_model(&self, base_path: &Path, filename: &str) -> Option<Arc<WorldModel>> {
        self.models.acquire(base_path, filename)
    }

    /// Return a model obtained from [`Self::acquire_model`]
    pub fn release_model(&self, filename: &str) {
        self.models.release(filename);
    }

    /// Parent of a map, `None` for top-level maps
    pub fn get_parent_map_id(&self, map_id: u32) -> Option<u32> {
        self.relations.parent(map_id)
    }

    /// The map relation
    pub const fn relations(&self) -> &MapRelations {
        &self.relations
    }

    /// Whether a map currently has a tree
    pub fn is_map_loaded(&self, map_id: u32) -> bool {
        self.trees.lock().contains_key(&map_id)
    }

    /// Whether a map tile is loaded
    pub fn is_tile_loaded(&self, map_id: u32, x: u32, y: u32) -> bool {
        self.trees
            .lock()
            .get(&map_id)
            .is_some_and(|tree| tree.is_tile_loaded(x, y))
    }

    /// Number of loaded tiles of a map
    pub fn loaded_tile_count(&self, map_id: u32) -> usize {
        self.trees
            .lock()
            .get(&map_id)
            .map_or(0, StaticMapTree::loaded_tile_count)
    }

    /// Number of models placed on a loaded tile
    pub fn tile_model_count(&self, map_id: u32, x: u32, y: u32) -> usize {
        self.trees
            .lock()
            .get(&map_id)
            .map_or(0, |tree| tree.tile_models(x, y).len())
    }

    /// Reference count of a cached model
    pub fn model_ref_count(&self, filename: &str) -> Option<u32> {
        self.models.ref_count(filename)
    }

    /// Number of cached models
    pub fn cached_model_count(&self) -> usize {
        self.models.len()
    }
}

impl Default for VMapManager {
    fn default() -> Self {
        Self::new(MapRelations::default())
    }
}

impl fmt::Debug for VMapManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VMapManager")
            .field("relations", &self.relations)
            .field("maps", &self.trees.lock().len())
            .field("models", &self.models)
            .finish()
    }
}
