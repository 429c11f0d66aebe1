//! Reference-counted world model cache
//!
//! Models are shared by every tile that places them. The cache owns one
//! [`WorldModel`] per file name together with a reference count; callers get
//! an `Arc` handle from [`ModelCache::acquire`] and must pair it with
//! [`ModelCache::release`]. The entry is evicted as soon as its count
//! reaches zero.

use crate::format::{VmapFormat, WorldModel};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, warn};

struct ManagedModel {
    model: Arc<WorldModel>,
    ref_count: u32,
}

/// Process-wide cache of loaded world models
#[derive(Default)]
pub struct ModelCache {
    models: Mutex<HashMap<String, ManagedModel>>,
}

fn cache_key(filename: &str) -> &str {
    filename.strip_suffix('\0').unwrap_or(filename)
}

impl ModelCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a model, loading it from `base_path` on first use
    ///
    /// Returns `None` when the file is missing or cannot be parsed; the
    /// failure is logged and nothing is cached.
    pub fn acquire(&self, base_path: &Path, filename: &str) -> Option<Arc<WorldModel>> {
        let name = cache_key(filename);
        let mut models = self.models.lock();

        if let Some(managed) = models.get_mut(name) {
            managed.ref_count += 1;
            debug!("Model {} acquired (refs: {})", name, managed.ref_count);
            return Some(Arc::clone(&managed.model));
        }

        let path = base_path.join(name);
        let model = match WorldModel::load(&path) {
            Ok(model) => Arc::new(model),
            Err(e) => {
                error!("Failed to load model {}: {}", path.display(), e);
                return None;
            }
        };

        debug!(
            "Loaded model {} ({} groups, {} triangles)",
            name,
            model.groups.len(),
            model.triangle_count()
        );
        models.insert(
            name.to_string(),
            ManagedModel {
                model: Arc::clone(&model),
                ref_count: 1,
            },
        );
        Some(model)
    }

    /// Drop one reference; the model is evicted when none remain
    ///
    /// Releasing a name that is not cached is logged and ignored.
    pub fn release(&self, filename: &str) {
        let name = cache_key(filename);
        let mut models = self.models.lock();

        let Some(managed) = models.get_mut(name) else {
            warn!("Release of untracked model {}", name);
            return;
        };

        managed.ref_count -= 1;
        if managed.ref_count == 0 {
            models.remove(name);
            debug!("Evicted model {}", name);
        }
    }

    /// Current reference count of a cached model
    pub fn ref_count(&self, filename: &str) -> Option<u32> {
        self.models
            .lock()
            .get(cache_key(filename))
            .map(|m| m.ref_count)
    }

    /// Number of cached models
    pub fn len(&self) -> usize {
        self.models.lock().len()
    }

    /// Check if no models are cached
    pub fn is_empty(&self) -> bool {
        self.models.lock().is_empty()
    }
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCache")
            .field("models", &self.len())
            .finish()
    }
}
