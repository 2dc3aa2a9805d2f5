// src/config.rs
use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogId;
use crate::error::{LaiError, Result};
use crate::geometry::{DateRange, StudyArea};
use crate::processing::indices::LaiModel;

/// Run configuration, read from a JSON file
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PipelineConfig {
    /// Exterior rings of the study area polygons, `[x, y]` pairs
    pub study_area: Vec<Vec<[f64; 2]>>,
    pub start_date: NaiveDate,
    /// Exclusive
    pub end_date: NaiveDate,
    /// Scenes need cloud cover strictly below this percentage
    #[serde(default = "default_cloud_cover_max")]
    pub cloud_cover_max: f32,
    #[serde(default = "default_sources")]
    pub sources: Vec<CatalogId>,
    #[serde(default)]
    pub lai: LaiModel,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub catalog_timeout_secs: Option<u64>,
}

/// Settings handed to whatever renders the LAI scenes
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_display_min")]
    pub min: f32,
    #[serde(default = "default_display_max")]
    pub max: f32,
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    /// Number of leading scenes to show
    #[serde(default = "default_display_limit")]
    pub limit: usize,
}

fn default_cloud_cover_max() -> f32 {
    10.0
}

fn default_sources() -> Vec<CatalogId> {
    CatalogId::ALL.to_vec()
}

fn default_display_min() -> f32 {
    0.0
}

fn default_display_max() -> f32 {
    3.5
}

fn default_palette() -> Vec<String> {
    ["red", "white", "green"].iter().map(|c| c.to_string()).collect()
}

fn default_display_limit() -> usize {
    20
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            min: default_display_min(),
            max: default_display_max(),
            palette: default_palette(),
            limit: default_display_limit(),
        }
    }
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&content)?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.date_range()?;
        self.study_area()?;

        if !(0.0..=100.0).contains(&self.cloud_cover_max) {
            return Err(LaiError::InvalidConfig(format!(
                "cloud_cover_max must be within 0..=100, got {}",
                self.cloud_cover_max
            )));
        }
        if self.sources.is_empty() {
            return Err(LaiError::InvalidConfig(
                "at least one source collection is required".to_string(),
            ));
        }
        if let Some(dup) = self.sources.iter().duplicates().next() {
            return Err(LaiError::InvalidConfig(format!(
                "source collection {} is listed more than once",
                dup
            )));
        }
        if self.display.min >= self.display.max {
            return Err(LaiError::InvalidConfig(format!(
                "display min {} must be below max {}",
                self.display.min, self.display.max
            )));
        }
        if self.threads == Some(0) {
            return Err(LaiError::InvalidConfig("threads must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn date_range(&self) -> Result<DateRange> {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn study_area(&self) -> Result<StudyArea> {
        StudyArea::from_rings(&self.study_area)
    }

    pub fn catalog_timeout(&self) -> Option<Duration> {
        self.catalog_timeout_secs.map(Duration::from_secs)
    }
}
