use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lai-calc")]
#[command(about = "Leaf Area Index time series from Landsat 8/9 scenes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, global = true, default_value = "lai.json")]
    pub config: PathBuf,

    /// Catalog directory containing catalog.json
    #[arg(long, global = true, default_value = ".")]
    pub catalog: PathBuf,

    /// First day of the study period (overrides the config)
    #[arg(long, global = true)]
    pub start: Option<NaiveDate>,

    /// Day after the study period, exclusive (overrides the config)
    #[arg(long, global = true)]
    pub end: Option<NaiveDate>,

    /// Maximum cloud cover in percent, exclusive (overrides the config)
    #[arg(long, global = true)]
    pub cloud_max: Option<f32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the scenes that pass the selection filters
    Scenes,

    /// Select scenes and compute their LAI bands
    Run {
        /// Worker threads (default: number of CPUs)
        #[arg(short = 't', long)]
        threads: Option<usize>,

        /// Print a JSON summary instead of a table
        #[arg(long)]
        json: bool,
    },
}
