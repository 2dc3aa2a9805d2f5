// src/processing/scaling.rs
use regex::Regex;

use crate::error::{LaiError, Result};
use crate::scene::Scene;

/// Linear scale + offset for every band whose name matches `pattern`
#[derive(Debug, Clone)]
pub struct BandGroupScale {
    name: String,
    pattern: Regex,
    scale: f64,
    offset: f64,
}

impl BandGroupScale {
    /// `pattern` must match the whole band name
    pub fn new(name: impl Into<String>, pattern: &str, scale: f64, offset: f64) -> Result<Self> {
        let pattern = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| LaiError::InvalidConfig(format!("band pattern '{}': {}", pattern, e)))?;
        Ok(Self {
            name: name.into(),
            pattern,
            scale,
            offset,
        })
    }

    /// Collection-2 Level-2 surface reflectance, `SR_B1`..`SR_B7`
    pub fn reflectance() -> Self {
        Self::new("reflectance", "SR_B.", 0.0000275, -0.2).expect("static band pattern")
    }

    /// Collection-2 Level-2 surface temperature, `ST_B10` (Kelvin)
    pub fn thermal() -> Self {
        Self::new("thermal", "ST_B.*", 0.00341802, 149.0).expect("static band pattern")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, band: &str) -> bool {
        self.pattern.is_match(band)
    }

    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        (value as f64 * self.scale + self.offset) as f32
    }
}

/// Converts raw digital numbers to physical units, overwriting the raw bands.
///
/// Not idempotent: scaling an already scaled scene scales it twice.
#[derive(Debug, Clone)]
pub struct RadiometricScaler {
    groups: Vec<BandGroupScale>,
}

impl RadiometricScaler {
    pub fn new(groups: Vec<BandGroupScale>) -> Self {
        Self { groups }
    }

    /// Landsat 8/9 Collection-2 Level-2 scale factors
    pub fn landsat_c2l2() -> Self {
        Self::new(vec![BandGroupScale::reflectance(), BandGroupScale::thermal()])
    }

    pub fn groups(&self) -> &[BandGroupScale] {
        &self.groups
    }

    /// First group whose pattern matches `band`
    pub fn group_for(&self, band: &str) -> Option<&BandGroupScale> {
        self.groups.iter().find(|g| g.matches(band))
    }

    pub fn scale(&self, scene: &Scene) -> Scene {
        let mut scaled = scene.clone();
        for band in scene.bands() {
            if let Some(group) = self.group_for(&band.name) {
                let grid = band.grid.map(|v| group.apply(v));
                scaled = scaled.with_band(band.name.as_str(), grid);
            }
        }
        log::debug!("{}: radiometric scaling applied", scene.id());
        scaled
    }
}

impl Default for RadiometricScaler {
    fn default() -> Self {
        Self::landsat_c2l2()
    }
}
