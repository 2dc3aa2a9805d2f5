// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use lai_calc::cli::{Cli, Commands};
use lai_calc::processing::indices::LAI_BAND;
use lai_calc::scene::BandStats;
use lai_calc::{
    DirectoryCatalog, DisplayConfig, LaiPipeline, ParallelProcessor, PipelineConfig,
    SceneSelector,
};

#[derive(Serialize)]
struct SceneSummary {
    id: String,
    acquired: String,
    source: String,
    cloud_cover: f32,
    lai: Option<BandStats>,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    scenes: Vec<SceneSummary>,
    failures: Vec<(String, String)>,
    display: &'a DisplayConfig,
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if let Some(start) = cli.start {
        config.start_date = start;
    }
    if let Some(end) = cli.end {
        config.end_date = end;
    }
    if let Some(cloud_max) = cli.cloud_max {
        config.cloud_cover_max = cloud_max;
    }
    if let Commands::Run { threads: Some(threads), .. } = cli.command {
        config.threads = Some(threads);
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let catalog = DirectoryCatalog::open(&cli.catalog)?;
    let selector = SceneSelector::from_config(&config)?;
    let scenes = selector.select(&catalog)?;

    match &cli.command {
        Commands::Scenes => {
            for scene in &scenes {
                let meta = scene.metadata();
                println!(
                    "{}  {}  {:>5.1}%  {}",
                    meta.acquired.format("%Y-%m-%d %H:%M"),
                    scene.id(),
                    meta.cloud_cover,
                    meta.source
                );
            }
            println!("{} scenes", scenes.len());
        }
        Commands::Run { json, .. } => {
            let pipeline = LaiPipeline::with_model(config.lai);
            let processor = ParallelProcessor::new(config.threads);
            let report = processor.process_from(&catalog, &pipeline, scenes);
            let total = report.scenes.len();

            let summaries: Vec<SceneSummary> = report
                .scenes
                .limit(config.display.limit)
                .iter()
                .map(|scene| SceneSummary {
                    id: scene.id().to_string(),
                    acquired: scene.acquired().to_rfc3339(),
                    source: scene.metadata().source.to_string(),
                    cloud_cover: scene.cloud_cover(),
                    lai: scene.band(LAI_BAND).ok().and_then(|grid| grid.stats()),
                })
                .collect();
            let failures: Vec<(String, String)> = report
                .failures
                .iter()
                .map(|f| (f.scene_id.clone(), f.error.to_string()))
                .collect();

            if *json {
                let summary = RunSummary {
                    scenes: summaries,
                    failures,
                    display: &config.display,
                };
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                for s in &summaries {
                    match &s.lai {
                        Some(stats) => println!(
                            "{}  {}  lai min {:.3} mean {:.3} max {:.3} ({} px, {} no-data)",
                            s.acquired, s.id, stats.min, stats.mean, stats.max,
                            stats.valid_pixels, stats.nodata_pixels
                        ),
                        None => println!("{}  {}  lai: no valid pixels", s.acquired, s.id),
                    }
                }
                for (id, error) in &failures {
                    eprintln!("FAILED {}: {}", id, error);
                }
                println!(
                    "Processing complete: {} scenes ({} shown), {} failed",
                    total,
                    summaries.len(),
                    failures.len()
                );
            }
        }
    }

    Ok(())
}
