use anyhow::Result;
use clap::Parser;
use prodsim::cli::{execute_run, execute_stages, Cli, Commands, RunConfig};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 製品IDは標準出力、ログは標準エラーに分ける
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prodsim=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            stages,
            delay_ms,
            stddev_ms,
            negative_delay,
            seed,
            duration_secs,
            limit,
            config,
            verbose,
        } => {
            let run_config = RunConfig {
                stages,
                delay_ms,
                stddev_ms,
                negative_delay,
                seed,
                duration: duration_secs.map(Duration::from_secs),
                limit,
                config_file: config,
                verbose,
            };
            execute_run(run_config).await?;
        }
        Commands::Stages { config, json } => {
            execute_stages(config.as_deref(), json)?;
        }
    }

    Ok(())
}
