// src/processing/indices/ndi.rs
use crate::processing::indices::{NDVI_BAND, NIR_BAND, RED_BAND};
use crate::processing::parallel::IndexCalculator;
use crate::scene::{is_nodata, BandGrid, NODATA};
use rayon::prelude::*;

/// Normalized Difference Index (NDI) calculator: (A-B)/(A+B)
///
/// A pixel is no-data when either input is no-data or A+B is zero. A ratio
/// outside [-1, 1] is also no-data, so the output is always a proper
/// normalized difference. That case needs a negative input, which scaled
/// reflectance can produce over water and shadow. EVI is computed from the
/// reflectance bands, not from this band, so such a pixel may still carry
/// defined `evi` and `lai` values.
pub struct NDI {
    bands: [String; 2],
    name: String,
}

impl NDI {
    pub fn new(band_a: impl Into<String>, band_b: impl Into<String>, name: Option<String>) -> Self {
        Self {
            bands: [band_a.into(), band_b.into()],
            name: name.unwrap_or_else(|| "nd".to_string()),
        }
    }

    /// NDVI from the Landsat 8/9 NIR and red bands
    pub fn ndvi() -> Self {
        Self::new(NIR_BAND, RED_BAND, Some(NDVI_BAND.to_string()))
    }
}

impl IndexCalculator for NDI {
    fn calculate(&self, inputs: &[&BandGrid]) -> BandGrid {
        let band_a = inputs[0];
        let band_b = inputs[1];
        let a_data = band_a.data();
        let b_data = band_b.data();

        // Preallocate result buffer
        let mut result_data = vec![NODATA; band_a.len()];

        result_data.par_iter_mut().enumerate().for_each(|(i, result)| {
            let a_val = a_data[i];
            let b_val = b_data[i];
            let sum = a_val + b_val;

            if is_nodata(a_val) || is_nodata(b_val) || sum == 0.0 {
                return;
            }

            let nd = (a_val - b_val) / sum;
            if (-1.0..=1.0).contains(&nd) {
                *result = nd;
            }
        });

        BandGrid::from_parts(band_a.shape(), result_data)
    }

    fn input_bands(&self) -> &[String] {
        &self.bands
    }

    fn name(&self) -> &str {
        &self.name
    }
}
