//! Per-map tile tree

use crate::error::{Result, VmapError};
use crate::format::{
    MapTreeFile, ModelSpawn, TileCoord, TileFile, VmapFormat, WorldModel, tile_file_name,
    tree_file_name,
};
use crate::model_cache::ModelCache;
use std::collections::{BTreeSet, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// A model placed on a loaded tile
#[derive(Debug, Clone)]
pub struct PlacedModel {
    /// Placement read from the tile file
    pub spawn: ModelSpawn,
    /// Shared geometry
    pub model: Arc<WorldModel>,
}

#[derive(Debug)]
struct LoadedTile {
    load_count: u32,
    models: Vec<PlacedModel>,
}

/// Tile state of one map
#[derive(Debug)]
pub struct StaticMapTree {
    map_id: u32,
    base_path: PathBuf,
    tiled: bool,
    available: BTreeSet<TileCoord>,
    loaded: HashMap<TileCoord, LoadedTile>,
}

impl StaticMapTree {
    /// Open the tree file of a map
    ///
    /// `Ok(None)` means the map has no tree file and therefore no geometry.
    /// A tree file that exists but cannot be parsed is an error.
    pub fn open(base_path: &Path, map_id: u32) -> Result<Option<Self>> {
        let path = base_path.join(tree_file_name(map_id));
        let file = match MapTreeFile::load(&path) {
            Ok(file) => file,
            Err(VmapError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!("No tree file for map {}", map_id);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        debug!(
            "Opened tree for map {} ({}, {} tiles with geometry)",
            map_id,
            if file.tiled { "tiled" } else { "global" },
            file.tiles.len()
        );
        Ok(Some(Self {
            map_id,
            base_path: base_path.to_path_buf(),
            tiled: file.tiled,
            available: file.tiles.into_iter().collect(),
            loaded: HashMap::new(),
        }))
    }

    /// Map id
    pub const fn map_id(&self) -> u32 {
        self.map_id
    }

    /// Whether the map uses the tile grid
    pub const fn is_tiled(&self) -> bool {
        self.tiled
    }

    fn slot(&self, x: u32, y: u32) -> TileCoord {
        if self.tiled {
            TileCoord::new(x, y)
        } else {
            TileCoord::GLOBAL
        }
    }

    /// Load a tile or add one more reference to it
    ///
    /// Tiles the tree does not list load with no models. A listed tile whose
    /// file is missing or malformed fails and stays unloaded. Models that
    /// cannot be acquired are skipped.
    pub fn load_tile(&mut self, x: u32, y: u32, cache: &ModelCache) -> Result<()> {
        let slot = self.slot(x, y);
        if let Some(tile) = self.loaded.get_mut(&slot) {
            tile.load_count += 1;
            debug!(
                "Map {} tile {},{} already loaded (count: {})",
                self.map_id, slot.x, slot.y, tile.load_count
            );
            return Ok(());
        }

        let models = if self.available.contains(&slot) {
            self.read_tile(slot, cache)?
        } else {
            Vec::new()
        };

        debug!(
            "Loaded map {} tile {},{} with {} models",
            self.map_id,
            slot.x,
            slot.y,
            models.len()
        );
        self.loaded.insert(
            slot,
            LoadedTile {
                load_count: 1,
                models,
            },
        );
        Ok(())
    }

    fn read_tile(&self, slot: TileCoord, cache: &ModelCache) -> Result<Vec<PlacedModel>> {
        let path = self.base_path.join(tile_file_name(self.map_id, slot));
        let file = match TileFile::load(&path) {
            Ok(file) => file,
            Err(VmapError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(VmapError::MissingTile {
                    map_id: self.map_id,
                    x: slot.x,
                    y: slot.y,
                });
            }
            Err(e) => return Err(e),
        };

        let mut models = Vec::with_capacity(file.spawns.len());
        for spawn in file.spawns {
            match cache.acquire(&self.base_path, &spawn.name) {
                Some(model) => models.push(PlacedModel { spawn, model }),
                None => error!(
                    "Map {} tile {},{}: skipping spawn {} ({})",
                    self.map_id,
                    slot.x,
                    slot.y,
                    spawn.id,
                    spawn.model_name()
                ),
            }
        }
        Ok(models)
    }

    /// Drop one reference to a tile, releasing its models at zero
    ///
    /// Returns `false` when the tile was not loaded.
    pub fn unload_tile(&mut self, x: u32, y: u32, cache: &ModelCache) -> bool {
        let slot = self.slot(x, y);
        let Some(tile) = self.loaded.get_mut(&slot) else {
            warn!(
                "Unload of map {} tile {},{} which is not loaded",
                self.map_id, slot.x, slot.y
            );
            return false;
        };

        tile.load_count -= 1;
        if tile.load_count == 0
            && let Some(tile) = self.loaded.remove(&slot)
        {
            for placed in &tile.models {
                cache.release(&placed.spawn.name);
            }
            debug!("Unloaded map {} tile {},{}", self.map_id, slot.x, slot.y);
        }
        true
    }

    /// Whether a tile is loaded
    pub fn is_tile_loaded(&self, x: u32, y: u32) -> bool {
        self.loaded.contains_key(&self.slot(x, y))
    }

    /// Number of distinct loaded tiles
    pub fn loaded_tile_count(&self) -> usize {
        self.loaded.len()
    }

    /// Models placed on a loaded tile
    pub fn tile_models(&self, x: u32, y: u32) -> &[PlacedModel] {
        self.loaded
            .get(&self.slot(x, y))
            .map(|tile| tile.models.as_slice())
            .unwrap_or_default()
    }

    /// Release every loaded tile regardless of its load count
    pub fn unload_all(&mut self, cache: &ModelCache) {
        for (_, tile) in self.loaded.drain() {
            for placed in &tile.models {
                cache.release(&placed.spawn.name);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::format::{ModelGroup, Vec3};
    use tempfile::TempDir;

    fn fixture(dir: &Path) {
        let group = ModelGroup::new(
            0,
            1,
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2]],
        );
        WorldModel::new(1, vec![group]).save(&dir.join("hut.vmo")).unwrap();
        MapTreeFile::tiled(vec![TileCoord::new(1, 1)])
            .save(&dir.join(tree_file_name(0)))
            .unwrap();
        TileFile::new(vec![ModelSpawn {
            id: 1,
            flags: 0,
            position: Vec3::default(),
            rotation: Vec3::default(),
            scale: 1.0,
            name: "hut.vmo\0".to_string(),
        }])
        .save(&dir.join(tile_file_name(0, TileCoord::new(1, 1))))
        .unwrap();
    }

    #[test]
    fn missing_tree_opens_as_none() {
        let dir = TempDir::new().unwrap();
        assert!(StaticMapTree::open(dir.path(), 5).unwrap().is_none());
    }

    #[test]
    fn load_counts_balance() {
        let dir = TempDir::new().unwrap();
        fixture(dir.path());
        let cache = ModelCache::new();
        let mut tree = StaticMapTree::open(dir.path(), 0).unwrap().unwrap();

        tree.load_tile(1, 1, &cache).unwrap();
        tree.load_tile(1, 1, &cache).unwrap();
        assert_eq!(tree.loaded_tile_count(), 1);
        assert_eq!(tree.tile_models(1, 1).len(), 1);
        assert_eq!(cache.ref_count("hut.vmo"), Some(1));

        assert!(tree.unload_tile(1, 1, &cache));
        assert!(tree.is_tile_loaded(1, 1));
        assert!(tree.unload_tile(1, 1, &cache));
        assert!(!tree.is_tile_loaded(1, 1));
        assert!(cache.is_empty());
        assert!(!tree.unload_tile(1, 1, &cache));
    }

    #[test]
    fn unlisted_tile_loads_empty() {
        let dir = TempDir::new().unwrap();
        fixture(dir.path());
        let cache = ModelCache::new();
        let mut tree = StaticMapTree::open(dir.path(), 0).unwrap().unwrap();

        tree.load_tile(2, 2, &cache).unwrap();
        assert!(tree.is_tile_loaded(2, 2));
        assert!(tree.tile_models(2, 2).is_empty());
    }

    #[test]
    fn listed_tile_without_file_fails() {
        let dir = TempDir::new().unwrap();
        MapTreeFile::tiled(vec![TileCoord::new(3, 4)])
            .save(&dir.path().join(tree_file_name(9)))
            .unwrap();
        let cache = ModelCache::new();
        let mut tree = StaticMapTree::open(dir.path(), 9).unwrap().unwrap();

        assert!(matches!(
            tree.load_tile(3, 4, &cache),
            Err(VmapError::MissingTile { map_id: 9, x: 3, y: 4 })
        ));
        assert_eq!(tree.loaded_tile_count(), 0);
    }

    #[test]
    fn global_map_ignores_coordinates() {
        let dir = TempDir::new().unwrap();
        MapTreeFile::global(false)
            .save(&dir.path().join(tree_file_name(33)))
            .unwrap();
        let cache = ModelCache::new();
        let mut tree = StaticMapTree::open(dir.path(), 33).unwrap().unwrap();

        tree.load_tile(10, 20, &cache).unwrap();
        tree.load_tile(30, 40, &cache).unwrap();
        assert_eq!(tree.loaded_tile_count(), 1);
        assert!(tree.is_tile_loaded(0, 0));
    }
}
