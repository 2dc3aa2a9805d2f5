// src/catalog/mod.rs
//! Scene catalogs: the read-only data source the selector queries.

pub mod directory;
pub mod memory;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LaiError, Result};
use crate::geometry::{DateRange, StudyArea};
use crate::scene::{scene_order, Scene};

pub use directory::{CatalogManifest, DirectoryCatalog, SceneEntry};
pub use memory::MemoryCatalog;

/// Source collections scenes can be drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CatalogId {
    /// Landsat-8 Collection-2 Level-2
    #[serde(rename = "LANDSAT/LC08/C02/T1_L2")]
    Landsat8C2L2,
    /// Landsat-9 Collection-2 Level-2
    #[serde(rename = "LANDSAT/LC09/C02/T1_L2")]
    Landsat9C2L2,
}

impl CatalogId {
    pub const ALL: [CatalogId; 2] = [CatalogId::Landsat8C2L2, CatalogId::Landsat9C2L2];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogId::Landsat8C2L2 => "LANDSAT/LC08/C02/T1_L2",
            CatalogId::Landsat9C2L2 => "LANDSAT/LC09/C02/T1_L2",
        }
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogId {
    type Err = LaiError;

    fn from_str(s: &str) -> Result<Self> {
        CatalogId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| LaiError::InvalidConfig(format!("unknown catalog collection: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    AcquisitionTime,
    CloudCover,
}

impl SortKey {
    pub fn sort(&self, scenes: &mut [Scene]) {
        match self {
            SortKey::AcquisitionTime => scenes.sort_by(scene_order),
            SortKey::CloudCover => scenes.sort_by(|a, b| {
                a.cloud_cover()
                    .total_cmp(&b.cloud_cover())
                    .then_with(|| scene_order(a, b))
            }),
        }
    }
}

/// A catalog request: which sources, where, when, and in what order
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub sources: Vec<CatalogId>,
    pub bounds: StudyArea,
    pub date_range: DateRange,
    pub sort: SortKey,
    /// Optional pushdown of the cloud-cover predicate. Catalogs may use it
    /// to skip reading rasters; the selector applies the filter regardless.
    pub cloud_cover_lt: Option<f32>,
    /// Handed to the catalog as-is
    pub timeout: Option<Duration>,
}

impl CatalogQuery {
    pub fn new(sources: Vec<CatalogId>, bounds: StudyArea, date_range: DateRange) -> Self {
        Self {
            sources,
            bounds,
            date_range,
            sort: SortKey::default(),
            cloud_cover_lt: None,
            timeout: None,
        }
    }

    /// Same query restricted to a single source
    pub fn for_source(&self, source: CatalogId) -> Self {
        Self {
            sources: vec![source],
            ..self.clone()
        }
    }

    pub fn matches_source(&self, source: CatalogId) -> bool {
        self.sources.contains(&source)
    }

    pub fn matches_cloud_cover(&self, cloud_cover: f32) -> bool {
        self.cloud_cover_lt.map_or(true, |max| cloud_cover < max)
    }

    /// Source, footprint and date predicates, without the cloud pushdown
    pub fn matches(&self, scene: &Scene) -> bool {
        let meta = scene.metadata();
        self.matches_source(meta.source)
            && self.date_range.contains(meta.acquired)
            && self.bounds.intersects(&meta.footprint)
    }
}

/// Read-only scene source.
///
/// `query` returns scenes that match `query` sorted by `query.sort`; an empty
/// result is not an error. Catalogs backed by files may return scenes
/// carrying metadata only and attach pixel data in `load_bands`, which runs
/// once per scene as it enters processing.
pub trait Catalog: Send + Sync {
    fn query(&self, query: &CatalogQuery) -> Result<Vec<Scene>>;

    /// Attach the raster bands of a scene returned by `query`.
    ///
    /// An error here concerns this scene only.
    fn load_bands(&self, scene: Scene) -> Result<Scene> {
        Ok(scene)
    }
}
