// src/processing/indices/mod.rs
pub mod evi;
pub mod lai;
pub mod ndi;

// Re-export indices
pub use evi::EVI;
pub use lai::{LaiModel, LAI};
pub use ndi::NDI;

use crate::error::{LaiError, Result};
use crate::processing::parallel::IndexCalculator;
use crate::scene::Scene;

/// Landsat 8/9 OLI surface reflectance bands used by the indices
pub const BLUE_BAND: &str = "SR_B2";
pub const RED_BAND: &str = "SR_B4";
pub const NIR_BAND: &str = "SR_B5";

/// Derived band names
pub const NDVI_BAND: &str = "ndvi";
pub const EVI_BAND: &str = "evi";
pub const LAI_BAND: &str = "lai";

/// Compute `calculator` on `scene` and append its output band.
///
/// Fails with `MissingBand` when an input band is absent and with
/// `ShapeMismatch` when input bands disagree on size.
pub fn apply_index<C>(scene: Scene, calculator: &C) -> Result<Scene>
where
    C: IndexCalculator + ?Sized,
{
    let names = calculator.input_bands();
    let mut inputs = Vec::with_capacity(names.len());
    for name in names {
        inputs.push(scene.band(name)?);
    }

    if let Some(first) = inputs.first() {
        let expected = first.shape();
        for (name, grid) in names.iter().zip(&inputs) {
            if grid.shape() != expected {
                return Err(LaiError::ShapeMismatch {
                    scene: scene.id().to_string(),
                    band: name.clone(),
                    expected,
                    actual: grid.shape(),
                });
            }
        }
    }

    let result = calculator.calculate(&inputs);
    log::debug!("{}: computed {}", scene.id(), calculator.name());

    Ok(scene.with_band(calculator.name(), result))
}
