// src/catalog/directory.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogId, CatalogQuery};
use crate::error::{LaiError, Result};
use crate::geometry::polygon_from_ring;
use crate::io::read_band;
use crate::scene::{Scene, SceneMetadata};
use crate::utils::RasterCache;

/// Manifest file expected at the root of a catalog directory
pub const MANIFEST_FILE: &str = "catalog.json";

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct CatalogManifest {
    #[serde(default)]
    pub scenes: Vec<SceneEntry>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SceneEntry {
    pub id: String,
    pub collection: CatalogId,
    pub acquired: DateTime<Utc>,
    pub cloud_cover: f32,
    #[serde(default)]
    pub spacecraft: String,
    /// Exterior ring of the scene footprint, `[x, y]` pairs
    pub footprint: Vec<[f64; 2]>,
    #[serde(default)]
    pub projection: String,
    #[serde(default = "default_geo_transform")]
    pub geo_transform: [f64; 6],
    /// Band name to raster file, relative to the catalog directory
    pub bands: BTreeMap<String, PathBuf>,
}

fn default_geo_transform() -> [f64; 6] {
    [0.0, 1.0, 0.0, 0.0, 0.0, -1.0]
}

impl SceneEntry {
    pub fn metadata(&self) -> SceneMetadata {
        SceneMetadata {
            source: self.collection,
            acquired: self.acquired,
            cloud_cover: self.cloud_cover,
            spacecraft: self.spacecraft.clone(),
            footprint: polygon_from_ring(&self.footprint),
            projection: self.projection.clone(),
            geo_transform: self.geo_transform,
        }
    }
}

/// Local catalog: a directory holding `catalog.json` plus one raster file per band
pub struct DirectoryCatalog {
    root: PathBuf,
    manifest: CatalogManifest,
    cache: Arc<RasterCache>,
}

impl DirectoryCatalog {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::with_cache(root, Arc::new(RasterCache::new()))
    }

    pub fn with_cache<P: AsRef<Path>>(root: P, cache: Arc<RasterCache>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_FILE);

        let content = fs::read_to_string(&manifest_path).map_err(|e| {
            LaiError::data_source(
                root.display().to_string(),
                format!("cannot read {}: {}", manifest_path.display(), e),
            )
        })?;
        let manifest: CatalogManifest = serde_json::from_str(&content).map_err(|e| {
            LaiError::data_source(
                root.display().to_string(),
                format!("malformed {}: {}", manifest_path.display(), e),
            )
        })?;

        log::info!(
            "Opened catalog {} with {} scenes",
            root.display(),
            manifest.scenes.len()
        );

        Ok(Self {
            root,
            manifest,
            cache,
        })
    }

    pub fn manifest(&self) -> &CatalogManifest {
        &self.manifest
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry(&self, scene: &Scene) -> Option<&SceneEntry> {
        self.manifest
            .scenes
            .iter()
            .find(|entry| entry.id == scene.id() && entry.collection == scene.metadata().source)
    }
}

impl Catalog for DirectoryCatalog {
    /// Filters on manifest metadata only; the scenes come back without bands
    fn query(&self, query: &CatalogQuery) -> Result<Vec<Scene>> {
        let mut scenes: Vec<Scene> = self
            .manifest
            .scenes
            .iter()
            .filter(|entry| {
                query.matches_source(entry.collection)
                    && query.date_range.contains(entry.acquired)
                    && query.matches_cloud_cover(entry.cloud_cover)
                    && query.bounds.intersects(&polygon_from_ring(&entry.footprint))
            })
            .map(|entry| Scene::new(&entry.id, entry.metadata()))
            .collect();

        log::debug!(
            "Catalog {} matched {} of {} scenes",
            self.root.display(),
            scenes.len(),
            self.manifest.scenes.len()
        );

        query.sort.sort(&mut scenes);

        Ok(scenes)
    }

    fn load_bands(&self, scene: Scene) -> Result<Scene> {
        let entry = self.entry(&scene).ok_or_else(|| {
            LaiError::data_source(
                scene.metadata().source.as_str(),
                format!("{}: not in {}", scene.id(), MANIFEST_FILE),
            )
        })?;

        let mut scene = scene;
        for (name, file) in &entry.bands {
            let path = self.root.join(file);
            let grid = self.cache.get_or_load(&path, read_band).map_err(|e| {
                LaiError::data_source(entry.collection.as_str(), format!("{}: {}", entry.id, e))
            })?;
            scene = scene.with_band(name.as_str(), grid);
        }

        log::debug!("{}: loaded {} bands", entry.id, entry.bands.len());
        Ok(scene)
    }
}
