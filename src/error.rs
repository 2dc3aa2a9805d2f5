//! Error types for the LAI pipeline

use thiserror::Error;

/// Main error type for catalog access and scene processing
#[derive(Error, Debug)]
pub enum LaiError {
    /// The catalog could not be reached or rejected the query.
    #[error("Data source error ({source_id}): {message}")]
    DataSource { source_id: String, message: String },

    /// A stage was run on a scene lacking one of its input bands.
    #[error("Scene {scene} has no band '{band}'")]
    MissingBand { scene: String, band: String },

    #[error("Band size mismatch in scene {scene}: expected {expected:?}, got {actual:?} for '{band}'")]
    ShapeMismatch {
        scene: String,
        band: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid raster dimensions: {width}x{height} with {len} values")]
    InvalidDimensions { width: usize, height: usize, len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GDAL error: {0}")]
    #[cfg(feature = "gdal")]
    Gdal(String),
}

impl LaiError {
    pub fn data_source(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        LaiError::DataSource {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    pub fn missing_band(scene: impl Into<String>, band: impl Into<String>) -> Self {
        LaiError::MissingBand {
            scene: scene.into(),
            band: band.into(),
        }
    }
}

#[cfg(feature = "gdal")]
impl From<gdal::errors::GdalError> for LaiError {
    fn from(e: gdal::errors::GdalError) -> Self {
        LaiError::Gdal(e.to_string())
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, LaiError>;
