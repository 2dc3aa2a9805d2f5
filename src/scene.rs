// src/scene.rs
use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use geo::Polygon;
use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::CatalogId;
use crate::error::{LaiError, Result};

/// In-memory no-data marker for undefined pixels
pub const NODATA: f32 = f32::NAN;

#[inline]
pub fn is_nodata(value: f32) -> bool {
    value.is_nan()
}

/// A single 2-D band, row-major, shape is (width, height)
#[derive(Debug, Clone, PartialEq)]
pub struct BandGrid {
    shape: (usize, usize),
    data: Vec<f32>,
}

impl BandGrid {
    pub fn new(shape: (usize, usize), data: Vec<f32>) -> Result<Self> {
        if pixel_count(shape, data.len())? != data.len() {
            return Err(LaiError::InvalidDimensions {
                width: shape.0,
                height: shape.1,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Caller guarantees `data.len() == shape.0 * shape.1`
    pub(crate) fn from_parts(shape: (usize, usize), data: Vec<f32>) -> Self {
        debug_assert_eq!(shape.0 * shape.1, data.len());
        Self { shape, data }
    }

    pub fn filled(shape: (usize, usize), value: f32) -> Result<Self> {
        let len = pixel_count(shape, 0)?;
        Ok(Self {
            shape,
            data: vec![value; len],
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.shape.0 || y >= self.shape.1 {
            return None;
        }
        self.data.get(y * self.shape.0 + x).copied()
    }

    /// Apply `f` to every pixel in parallel, producing a grid of the same shape
    pub fn map<F>(&self, f: F) -> BandGrid
    where
        F: Fn(f32) -> f32 + Sync + Send,
    {
        BandGrid {
            shape: self.shape,
            data: self.data.par_iter().map(|&v| f(v)).collect(),
        }
    }

    /// Summary over defined pixels, `None` when every pixel is undefined
    pub fn stats(&self) -> Option<BandStats> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut valid = 0usize;

        for &v in self.data.iter().filter(|v| !is_nodata(**v)) {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
            valid += 1;
        }

        if valid == 0 {
            return None;
        }

        Some(BandStats {
            min,
            max,
            mean: sum / valid as f64,
            valid_pixels: valid,
            nodata_pixels: self.data.len() - valid,
        })
    }
}

/// `width * height`, or `InvalidDimensions` when it overflows
fn pixel_count(shape: (usize, usize), len: usize) -> Result<usize> {
    shape
        .0
        .checked_mul(shape.1)
        .ok_or(LaiError::InvalidDimensions {
            width: shape.0,
            height: shape.1,
            len,
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
    pub valid_pixels: usize,
    pub nodata_pixels: usize,
}

/// Acquisition metadata carried unchanged through every stage
#[derive(Debug, Clone)]
pub struct SceneMetadata {
    pub source: CatalogId,
    pub acquired: DateTime<Utc>,
    /// Whole-scene cloud cover, percent
    pub cloud_cover: f32,
    pub spacecraft: String,
    pub footprint: Polygon<f64>,
    pub projection: String,
    pub geo_transform: [f64; 6],
}

#[derive(Debug, Clone)]
pub struct Band {
    pub name: String,
    pub grid: Arc<BandGrid>,
}

/// One acquisition: metadata plus an ordered list of named bands.
///
/// Stages never mutate a scene they were handed: they clone it and add or
/// replace bands on the copy. Band grids are shared between copies via `Arc`.
#[derive(Debug, Clone)]
pub struct Scene {
    id: String,
    metadata: SceneMetadata,
    bands: Vec<Band>,
}

impl Scene {
    pub fn new(id: impl Into<String>, metadata: SceneMetadata) -> Self {
        Self {
            id: id.into(),
            metadata,
            bands: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata(&self) -> &SceneMetadata {
        &self.metadata
    }

    pub fn acquired(&self) -> DateTime<Utc> {
        self.metadata.acquired
    }

    pub fn cloud_cover(&self) -> f32 {
        self.metadata.cloud_cover
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn band_names(&self) -> impl Iterator<Item = &str> {
        self.bands.iter().map(|b| b.name.as_str())
    }

    pub fn has_band(&self, name: &str) -> bool {
        self.bands.iter().any(|b| b.name == name)
    }

    pub fn band(&self, name: &str) -> Result<&BandGrid> {
        self.band_arc(name)
            .map(|grid| grid.as_ref())
            .ok_or_else(|| LaiError::missing_band(&self.id, name))
    }

    pub fn band_arc(&self, name: &str) -> Option<&Arc<BandGrid>> {
        self.bands.iter().find(|b| b.name == name).map(|b| &b.grid)
    }

    /// Replace the band called `name` in place, or append it when absent
    pub fn with_band(mut self, name: impl Into<String>, grid: impl Into<Arc<BandGrid>>) -> Self {
        let name = name.into();
        let grid = grid.into();
        match self.bands.iter_mut().find(|b| b.name == name) {
            Some(existing) => existing.grid = grid,
            None => self.bands.push(Band { name, grid }),
        }
        self
    }

    /// New scene with the same metadata and only the named bands, in the order given
    pub fn select(&self, names: &[&str]) -> Result<Scene> {
        let mut bands = Vec::with_capacity(names.len());
        for &name in names {
            let grid = self
                .band_arc(name)
                .ok_or_else(|| LaiError::missing_band(&self.id, name))?;
            bands.push(Band {
                name: name.to_string(),
                grid: Arc::clone(grid),
            });
        }

        Ok(Scene {
            id: self.id.clone(),
            metadata: self.metadata.clone(),
            bands,
        })
    }
}

/// Ascending acquisition time, ties broken by scene identifier
pub fn scene_order(a: &Scene, b: &Scene) -> Ordering {
    a.acquired()
        .cmp(&b.acquired())
        .then_with(|| a.id().cmp(b.id()))
}

/// Scenes ordered by [`scene_order`]
#[derive(Debug, Clone, Default)]
pub struct SceneCollection {
    scenes: Vec<Scene>,
}

impl SceneCollection {
    pub fn from_unsorted(mut scenes: Vec<Scene>) -> Self {
        scenes.sort_by(scene_order);
        Self { scenes }
    }

    pub(crate) fn from_sorted(scenes: Vec<Scene>) -> Self {
        debug_assert!(scenes
            .windows(2)
            .all(|w| scene_order(&w[0], &w[1]).is_le()));
        Self { scenes }
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn first(&self) -> Option<&Scene> {
        self.scenes.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scene> {
        self.scenes.iter()
    }

    /// Keep only the first `n` scenes
    pub fn limit(mut self, n: usize) -> Self {
        self.scenes.truncate(n);
        self
    }

    pub fn into_vec(self) -> Vec<Scene> {
        self.scenes
    }
}

impl IntoIterator for SceneCollection {
    type Item = Scene;
    type IntoIter = std::vec::IntoIter<Scene>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenes.into_iter()
    }
}

impl<'a> IntoIterator for &'a SceneCollection {
    type Item = &'a Scene;
    type IntoIter = std::slice::Iter<'a, Scene>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenes.iter()
    }
}
