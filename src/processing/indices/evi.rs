// src/processing/indices/evi.rs
use crate::processing::indices::{BLUE_BAND, EVI_BAND, NIR_BAND, RED_BAND};
use crate::processing::parallel::IndexCalculator;
use crate::scene::{is_nodata, BandGrid, NODATA};
use rayon::prelude::*;

// EVI coefficients from MODIS documentation
const G: f32 = 2.5; // Gain factor
const L: f32 = 1.0; // Canopy background adjustment
const C1: f32 = 6.0; // Aerosol resistance (red)
const C2: f32 = 7.5; // Aerosol resistance (blue)

/// Enhanced Vegetation Index (EVI) calculator
///
/// `EVI = G * (NIR - RED) / (NIR + C1*RED - C2*BLUE + L)`
///
/// Expects reflectance, not raw digital numbers. The result is not clamped.
pub struct EVI {
    bands: [String; 3],
    name: String,
}

impl EVI {
    pub fn new(
        nir: impl Into<String>,
        red: impl Into<String>,
        blue: impl Into<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            bands: [nir.into(), red.into(), blue.into()],
            name: name.unwrap_or_else(|| EVI_BAND.to_string()),
        }
    }

    /// EVI from the Landsat 8/9 NIR, red and blue bands
    pub fn landsat() -> Self {
        Self::new(NIR_BAND, RED_BAND, BLUE_BAND, None)
    }
}

impl IndexCalculator for EVI {
    fn calculate(&self, inputs: &[&BandGrid]) -> BandGrid {
        let nir_band = inputs[0].data();
        let red_band = inputs[1].data();
        let blue_band = inputs[2].data();

        let mut result_data = vec![NODATA; nir_band.len()];

        result_data.par_iter_mut().enumerate().for_each(|(i, result)| {
            let nir_val = nir_band[i];
            let red_val = red_band[i];
            let blue_val = blue_band[i];

            if is_nodata(nir_val) || is_nodata(red_val) || is_nodata(blue_val) {
                return;
            }

            // No signal in either NIR or red: undefined, like the NDVI of the pixel
            if nir_val == 0.0 && red_val == 0.0 {
                return;
            }

            let denominator = nir_val + C1 * red_val - C2 * blue_val + L;
            if denominator != 0.0 {
                *result = G * (nir_val - red_val) / denominator;
            }
        });

        BandGrid::from_parts(inputs[0].shape(), result_data)
    }

    fn input_bands(&self) -> &[String] {
        &self.bands
    }

    fn name(&self) -> &str {
        &self.name
    }
}
