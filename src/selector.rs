// src/selector.rs
use std::time::Duration;

use itertools::Itertools;

use crate::catalog::{Catalog, CatalogId, CatalogQuery};
use crate::config::PipelineConfig;
use crate::error::{LaiError, Result};
use crate::geometry::{DateRange, StudyArea};
use crate::scene::{scene_order, Scene, SceneCollection};

/// Picks the scenes to process: study area, date range and cloud cover
#[derive(Debug, Clone)]
pub struct SceneSelector {
    study_area: StudyArea,
    date_range: DateRange,
    cloud_cover_max: f32,
    sources: Vec<CatalogId>,
    timeout: Option<Duration>,
}

impl SceneSelector {
    pub fn new(study_area: StudyArea, date_range: DateRange, cloud_cover_max: f32) -> Self {
        Self {
            study_area,
            date_range,
            cloud_cover_max,
            sources: CatalogId::ALL.to_vec(),
            timeout: None,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self::new(config.study_area()?, config.date_range()?, config.cloud_cover_max)
            .with_sources(config.sources.clone())
            .with_timeout(config.catalog_timeout()))
    }

    /// Repeated collections are queried once
    pub fn with_sources(mut self, sources: Vec<CatalogId>) -> Self {
        self.sources = sources.into_iter().unique().collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn sources(&self) -> &[CatalogId] {
        &self.sources
    }

    pub fn query(&self) -> CatalogQuery {
        CatalogQuery {
            cloud_cover_lt: Some(self.cloud_cover_max),
            timeout: self.timeout,
            ..CatalogQuery::new(
                self.sources.clone(),
                self.study_area.clone(),
                self.date_range,
            )
        }
    }

    /// Whether `scene` passes every selection predicate
    pub fn accepts(&self, scene: &Scene) -> bool {
        let meta = scene.metadata();
        self.sources.contains(&meta.source)
            && self.date_range.contains(meta.acquired)
            && self.study_area.intersects(&meta.footprint)
            && meta.cloud_cover < self.cloud_cover_max
    }

    /// Query every source and merge the results in acquisition order.
    ///
    /// Fails with `DataSource` if any source cannot be queried. Scenes the
    /// catalog returns outside the filter are dropped.
    pub fn select<C: Catalog + ?Sized>(&self, catalog: &C) -> Result<SceneCollection> {
        let query = self.query();
        let mut candidates = 0usize;
        let mut per_source = Vec::with_capacity(self.sources.len());

        for &source in &self.sources {
            let mut scenes = catalog
                .query(&query.for_source(source))
                .map_err(|e| match e {
                    e @ LaiError::DataSource { .. } => e,
                    other => LaiError::data_source(source.as_str(), other.to_string()),
                })?;
            candidates += scenes.len();

            scenes.retain(|scene| {
                let meta = scene.metadata();
                let in_query = meta.source == source
                    && self.date_range.contains(meta.acquired)
                    && self.study_area.intersects(&meta.footprint);
                if !in_query {
                    log::warn!(
                        "Catalog returned scene {} outside the query for {}, dropping it",
                        scene.id(),
                        source
                    );
                }
                in_query && meta.cloud_cover < self.cloud_cover_max
            });
            scenes.sort_by(scene_order);

            log::debug!("{}: {} scenes selected", source, scenes.len());
            per_source.push(scenes);
        }

        let merged: Vec<Scene> = per_source
            .into_iter()
            .kmerge_by(|a, b| scene_order(a, b).is_lt())
            .collect();

        log::info!(
            "Selected {} of {} candidate scenes ({} to {}, cloud cover < {}%)",
            merged.len(),
            candidates,
            self.date_range.start(),
            self.date_range.end(),
            self.cloud_cover_max
        );

        Ok(SceneCollection::from_sorted(merged))
    }
}
