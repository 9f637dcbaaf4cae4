use crate::services::NegativeDelayPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prodsim")]
#[command(about = "A concurrent production line simulator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a production line and print items as they leave it
    Run {
        /// Stage name, in line order (repeatable). Defaults to the reference bakery line
        #[arg(short, long = "stage", value_name = "NAME")]
        stages: Vec<String>,

        /// Base delay of every stage in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,

        /// Standard deviation of the per-item delay perturbation in milliseconds
        #[arg(long, default_value = "200")]
        stddev_ms: u64,

        /// How to handle a perturbed delay that comes out negative
        #[arg(long, value_enum, default_value = "clamp")]
        negative_delay: NegativeDelayPolicy,

        /// Seed for reproducible delays
        #[arg(long)]
        seed: Option<u64>,

        /// Cancel the line after this many seconds (otherwise run until Ctrl-C)
        #[arg(short, long)]
        duration_secs: Option<u64>,

        /// End the stream after this many items
        #[arg(short, long)]
        limit: Option<u64>,

        /// Load the line from a JSON configuration file instead of the flags above
        #[arg(short, long, conflicts_with_all = [
            "stages",
            "delay_ms",
            "stddev_ms",
            "negative_delay",
            "seed"
        ])]
        config: Option<PathBuf>,

        /// Log stage lifecycle events
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the stages a line would be built with
    Stages {
        /// JSON configuration file (defaults to the reference bakery line)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the effective configuration as JSON
        #[arg(long)]
        json: bool,
    },
}
