// src/catalog/memory.rs
use crate::catalog::{Catalog, CatalogQuery};
use crate::error::Result;
use crate::scene::Scene;

/// Catalog backed by scenes already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    scenes: Vec<Scene>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scenes(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    pub fn insert(&mut self, scene: Scene) {
        self.scenes.push(scene);
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl Catalog for MemoryCatalog {
    fn query(&self, query: &CatalogQuery) -> Result<Vec<Scene>> {
        let mut hits: Vec<Scene> = self
            .scenes
            .iter()
            .filter(|scene| query.matches(scene) && query.matches_cloud_cover(scene.cloud_cover()))
            .cloned()
            .collect();

        query.sort.sort(&mut hits);
        Ok(hits)
    }
}
