// src/processing/mod.rs
pub mod derive;
pub mod extract;
pub mod indices;
pub mod parallel;
pub mod pipeline;
pub mod scaling;

// Re-export main components
pub use derive::IndexDeriver;
pub use extract::BandExtractor;
pub use parallel::{IndexCalculator, ParallelProcessor, ProcessReport, SceneFailure};
pub use pipeline::LaiPipeline;
pub use scaling::{BandGroupScale, RadiometricScaler};
