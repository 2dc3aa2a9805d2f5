// src/processing/extract.rs
use crate::error::Result;
use crate::processing::indices::LAI_BAND;
use crate::scene::Scene;

/// Projects a scene down to a fixed set of bands
#[derive(Debug, Clone)]
pub struct BandExtractor {
    bands: Vec<String>,
}

impl BandExtractor {
    pub fn new<I, S>(bands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bands: bands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lai() -> Self {
        Self::new([LAI_BAND])
    }

    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    pub fn extract(&self, scene: &Scene) -> Result<Scene> {
        let names: Vec<&str> = self.bands.iter().map(String::as_str).collect();
        scene.select(&names)
    }
}

impl Default for BandExtractor {
    fn default() -> Self {
        Self::lai()
    }
}
