// src/processing/parallel.rs
use std::thread;

use crate::catalog::Catalog;
use crate::error::{LaiError, Result};
use crate::processing::pipeline::LaiPipeline;
use crate::scene::{BandGrid, Scene, SceneCollection};

/// A scene the pipeline could not process, with the reason
#[derive(Debug)]
pub struct SceneFailure {
    pub scene_id: String,
    pub error: LaiError,
}

/// Outcome of processing a scene sequence
#[derive(Debug, Default)]
pub struct ProcessReport {
    /// Successful scenes, ascending by acquisition time
    pub scenes: SceneCollection,
    /// Failed scenes, in input order
    pub failures: Vec<SceneFailure>,
}

/// Spreads scenes over worker threads. Scenes are independent, so workers
/// share nothing but the read-only pipeline.
pub struct ParallelProcessor {
    threads: usize,
}

impl ParallelProcessor {
    pub fn new(threads: Option<usize>) -> Self {
        let threads = threads.unwrap_or_else(num_cpus::get).max(1);
        Self { threads }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Process scenes that already carry their bands
    pub fn process<I>(&self, pipeline: &LaiPipeline, scenes: I) -> ProcessReport
    where
        I: IntoIterator<Item = Scene>,
    {
        self.process_with(pipeline, scenes, Ok)
    }

    /// Process scenes from `catalog`, each worker loading a scene's bands
    /// right before running the pipeline on it. A scene whose bands cannot
    /// be read is reported as a failure like any other.
    pub fn process_from<C, I>(&self, catalog: &C, pipeline: &LaiPipeline, scenes: I) -> ProcessReport
    where
        C: Catalog + ?Sized,
        I: IntoIterator<Item = Scene>,
    {
        self.process_with(pipeline, scenes, |scene| catalog.load_bands(scene))
    }

    fn process_with<I, L>(&self, pipeline: &LaiPipeline, scenes: I, load: L) -> ProcessReport
    where
        I: IntoIterator<Item = Scene>,
        L: Fn(Scene) -> Result<Scene> + Sync,
    {
        let load = &load;
        let (job_tx, job_rx) = flume::unbounded::<(usize, Scene)>();
        let (out_tx, out_rx) = flume::unbounded::<(usize, String, Result<Scene>)>();

        let mut outcomes = thread::scope(|s| {
            for _ in 0..self.threads {
                let job_rx = job_rx.clone();
                let out_tx = out_tx.clone();
                s.spawn(move || {
                    for (seq, scene) in job_rx {
                        let scene_id = scene.id().to_string();
                        let outcome = load(scene).and_then(|scene| pipeline.process_scene(scene));
                        if out_tx.send((seq, scene_id, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(out_tx);

            for job in scenes.into_iter().enumerate() {
                if job_tx.send(job).is_err() {
                    break;
                }
            }
            drop(job_tx);

            out_rx.iter().collect::<Vec<_>>()
        });

        // Workers finish out of order
        outcomes.sort_by_key(|(seq, _, _)| *seq);

        let mut processed = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (_, scene_id, outcome) in outcomes {
            match outcome {
                Ok(scene) => processed.push(scene),
                Err(error) => {
                    log::warn!("Scene {} failed: {}", scene_id, error);
                    failures.push(SceneFailure { scene_id, error });
                }
            }
        }

        log::info!(
            "Processed {} scenes on {} threads ({} failed)",
            processed.len() + failures.len(),
            self.threads,
            failures.len()
        );

        ProcessReport {
            scenes: SceneCollection::from_unsorted(processed),
            failures,
        }
    }
}

/// Trait for spectral index calculators
pub trait IndexCalculator: Send + Sync {
    /// Calculate the index from the provided input bands.
    ///
    /// `inputs` holds one grid per entry of `input_bands`, in that order,
    /// all of the same shape.
    fn calculate(&self, inputs: &[&BandGrid]) -> BandGrid;

    /// Names of the scene bands this index reads
    fn input_bands(&self) -> &[String];

    /// Return the number of required input bands
    fn required_bands(&self) -> usize {
        self.input_bands().len()
    }

    /// Name of the band this index produces
    fn name(&self) -> &str;
}
