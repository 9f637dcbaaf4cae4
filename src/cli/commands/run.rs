use crate::core::CancellationToken;
use crate::engine::drive;
use crate::services::config::REFERENCE_STAGES;
use crate::services::{DelayConfig, LineConfig, NegativeDelayPolicy, StageKind, StageSpec};
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration struct for the run command to reduce argument count
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub stages: Vec<String>,
    pub delay_ms: u64,
    pub stddev_ms: u64,
    pub negative_delay: NegativeDelayPolicy,
    pub seed: Option<u64>,
    pub duration: Option<Duration>,
    pub limit: Option<u64>,
    pub config_file: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        let delay = DelayConfig::default();
        Self {
            stages: Vec::new(),
            delay_ms: delay.base_ms,
            stddev_ms: delay.stddev_ms,
            negative_delay: delay.negative_delay,
            seed: None,
            duration: None,
            limit: None,
            config_file: None,
            verbose: false,
        }
    }
}

/// Build the line configuration from a config file or the command line flags
pub fn resolve_line_config(config: &RunConfig) -> Result<LineConfig> {
    let mut line_config = match &config.config_file {
        Some(path) => LineConfig::from_json_file(path)?,
        None => {
            let mut delay = DelayConfig {
                base_ms: config.delay_ms,
                stddev_ms: config.stddev_ms,
                negative_delay: config.negative_delay,
                seed: None,
            };
            if let Some(seed) = config.seed {
                delay = delay.with_seed(seed);
            }

            if config.stages.is_empty() {
                LineConfig::uniform(REFERENCE_STAGES, &delay)
            } else {
                LineConfig::uniform(config.stages.iter().cloned(), &delay)
            }
        }
    };

    if config.verbose {
        line_config.verbose = true;
    }
    if let Some(count) = config.limit {
        line_config = line_config.with_stage(StageSpec::new("limit", StageKind::Limit { count }));
    }

    line_config.validate()?;
    Ok(line_config)
}

/// Execute the run command until Ctrl-C, the duration elapses, or the stream ends
pub async fn execute_run(config: RunConfig) -> Result<()> {
    let line_config = resolve_line_config(&config)?;
    let line = line_config.build_line(CancellationToken::new())?;

    info!(
        stages = line_config.stages.len(),
        duration = ?config.duration,
        "Starting production line"
    );

    let duration = config.duration;
    let stop = async move {
        match duration {
            Some(duration) => {
                tokio::select! {
                    _ = wait_for_ctrl_c() => {}
                    _ = tokio::time::sleep(duration) => {}
                }
            }
            None => wait_for_ctrl_c().await,
        }
        info!("Stopping production line");
    };

    let summary = drive(line, stop, |item| println!("{item}")).await?;

    info!(
        delivered = summary.delivered(),
        source_emitted = summary.source.emitted,
        source_exit = ?summary.source.exit,
        elapsed_ms = summary.total_duration_ms,
        "Production line finished"
    );
    for stage in &summary.stages {
        info!(
            stage = %stage.name,
            received = stage.received,
            emitted = stage.emitted,
            discarded = stage.discarded,
            exit = ?stage.exit,
            "Stage summary"
        );
    }

    Ok(())
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // シグナルを待てない環境では時間指定かストリーム終了でのみ止まる
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
