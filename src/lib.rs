// src/lib.rs
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod processing;
pub mod scene;
pub mod selector;
pub mod utils;

pub use catalog::{Catalog, CatalogId, CatalogQuery, DirectoryCatalog, MemoryCatalog};
pub use config::{DisplayConfig, PipelineConfig};
pub use error::{LaiError, Result};
pub use geometry::{DateRange, StudyArea};
pub use processing::{LaiPipeline, ParallelProcessor, ProcessReport};
pub use scene::{BandGrid, Scene, SceneCollection, SceneMetadata};
pub use selector::SceneSelector;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
