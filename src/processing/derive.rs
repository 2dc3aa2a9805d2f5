// src/processing/derive.rs
use crate::error::Result;
use crate::processing::indices::{apply_index, LaiModel, EVI, LAI, NDI};
use crate::processing::parallel::IndexCalculator;
use crate::scene::Scene;

/// Runs index calculators in order, each appending one band.
/// Later calculators may read bands added by earlier ones.
pub struct IndexDeriver {
    calculators: Vec<Box<dyn IndexCalculator>>,
}

impl IndexDeriver {
    pub fn new() -> Self {
        Self {
            calculators: Vec::new(),
        }
    }

    pub fn with<C: IndexCalculator + 'static>(mut self, calculator: C) -> Self {
        self.calculators.push(Box::new(calculator));
        self
    }

    /// ndvi, then evi, then lai from evi
    pub fn landsat(model: LaiModel) -> Self {
        Self::new()
            .with(NDI::ndvi())
            .with(EVI::landsat())
            .with(LAI::new(model))
    }

    pub fn output_bands(&self) -> Vec<&str> {
        self.calculators.iter().map(|c| c.name()).collect()
    }

    /// Original bands are kept; derived bands are appended
    pub fn derive(&self, scene: &Scene) -> Result<Scene> {
        self.calculators
            .iter()
            .try_fold(scene.clone(), |scene, calculator| {
                apply_index(scene, calculator.as_ref())
            })
    }
}

impl Default for IndexDeriver {
    fn default() -> Self {
        Self::landsat(LaiModel::default())
    }
}
