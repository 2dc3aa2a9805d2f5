// src/io/reader.rs
use std::path::Path;

#[cfg(feature = "gdal")]
use gdal::Dataset;

use crate::scene::BandGrid;
#[cfg(feature = "gdal")]
use crate::scene::NODATA;

#[cfg(not(feature = "gdal"))]
use crate::error::LaiError;
use crate::error::Result;

/// Read the first band of a raster file as `f32`.
///
/// Pixels equal to the file's no-data value come back as `NaN`.
#[cfg(feature = "gdal")]
pub fn read_band(path: &Path) -> Result<BandGrid> {
    log::debug!("Reading band file: {}", path.display());

    let dataset = Dataset::open(path)?;
    let (width, height) = dataset.raster_size();
    let band = dataset.rasterband(1)?;
    let nodata = band.no_data_value();

    let buffer = band.read_as::<f32>((0, 0), (width, height), (width, height), None)?;
    let data = buffer
        .data()
        .iter()
        .map(|&v| match nodata {
            Some(nd) if v as f64 == nd => NODATA,
            _ => v,
        })
        .collect();

    BandGrid::new((width, height), data)
}

#[cfg(not(feature = "gdal"))]
pub fn read_band(path: &Path) -> Result<BandGrid> {
    Err(LaiError::data_source(
        path.display().to_string(),
        "raster reading needs the `gdal` feature",
    ))
}
