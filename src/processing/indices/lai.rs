// src/processing/indices/lai.rs
use serde::{Deserialize, Serialize};

use crate::processing::indices::{EVI_BAND, LAI_BAND};
use crate::processing::parallel::IndexCalculator;
use crate::scene::{is_nodata, BandGrid};

/// Linear regression from EVI to Leaf Area Index: `lai = slope * evi + intercept`
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct LaiModel {
    #[serde(default = "default_slope")]
    pub slope: f32,
    #[serde(default = "default_intercept")]
    pub intercept: f32,
    /// Lower bound applied to defined pixels. Unset means no clamping.
    #[serde(default)]
    pub clamp_min: Option<f32>,
}

fn default_slope() -> f32 {
    3.618
}

fn default_intercept() -> f32 {
    -0.118
}

impl Default for LaiModel {
    fn default() -> Self {
        Self {
            slope: default_slope(),
            intercept: default_intercept(),
            clamp_min: None,
        }
    }
}

impl LaiModel {
    pub fn apply(&self, evi: f32) -> f32 {
        let lai = self.slope * evi + self.intercept;
        match self.clamp_min {
            Some(min) if !is_nodata(lai) => lai.max(min),
            _ => lai,
        }
    }
}

/// Leaf Area Index (LAI) calculator, derived from an EVI band
pub struct LAI {
    bands: [String; 1],
    model: LaiModel,
    name: String,
}

impl LAI {
    pub fn new(model: LaiModel) -> Self {
        Self::from_band(EVI_BAND, model, None)
    }

    pub fn from_band(evi: impl Into<String>, model: LaiModel, name: Option<String>) -> Self {
        Self {
            bands: [evi.into()],
            model,
            name: name.unwrap_or_else(|| LAI_BAND.to_string()),
        }
    }

    pub fn model(&self) -> &LaiModel {
        &self.model
    }
}

impl IndexCalculator for LAI {
    fn calculate(&self, inputs: &[&BandGrid]) -> BandGrid {
        // NaN evi stays NaN through the affine map
        let model = self.model;
        inputs[0].map(move |evi| model.apply(evi))
    }

    fn input_bands(&self) -> &[String] {
        &self.bands
    }

    fn name(&self) -> &str {
        &self.name
    }
}
