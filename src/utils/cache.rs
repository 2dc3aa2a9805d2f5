// src/utils/cache.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::Result;
use crate::scene::BandGrid;

/// Thread-safe registry of decoded band files, keyed by path.
///
/// Entries are weak: a grid stays shared while some scene still holds it and
/// is freed with the last scene, so the cache never pins raw bands.
#[derive(Debug, Default)]
pub struct RasterCache {
    grids: Mutex<HashMap<PathBuf, Weak<BandGrid>>>,
}

impl RasterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live grid for `path`, decoding it with `load` when none is held.
    /// Failed loads are not cached.
    pub fn get_or_load<P, F>(&self, path: P, load: F) -> Result<Arc<BandGrid>>
    where
        P: AsRef<Path>,
        F: FnOnce(&Path) -> Result<BandGrid>,
    {
        let path = path.as_ref();

        if let Some(grid) = self.grids.lock().get(path).and_then(Weak::upgrade) {
            return Ok(grid);
        }

        // Decode outside the lock; a concurrent loader of the same path just
        // overwrites an identical entry.
        let grid = Arc::new(load(path)?);
        let mut grids = self.grids.lock();
        grids.retain(|_, entry| entry.strong_count() > 0);
        grids.insert(path.to_path_buf(), Arc::downgrade(&grid));

        Ok(grid)
    }

    pub fn clear(&self) {
        self.grids.lock().clear();
    }

    /// Number of grids still held by at least one scene
    pub fn len(&self) -> usize {
        self.grids
            .lock()
            .values()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
