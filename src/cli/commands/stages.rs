use crate::services::{LineConfig, StageKind, StageSpec};
use anyhow::{Context, Result};
use std::path::Path;

/// Execute the stages command: print the stages of the configured line
pub fn execute_stages(config_file: Option<&Path>, json: bool) -> Result<()> {
    let line_config = match config_file {
        Some(path) => LineConfig::from_json_file(path)?,
        None => LineConfig::default(),
    };

    if json {
        let rendered = serde_json::to_string_pretty(&line_config)
            .context("failed to serialize line configuration")?;
        println!("{rendered}");
    } else {
        for (index, stage) in line_config.stages.iter().enumerate() {
            println!("{index}: {}", describe_stage(stage));
        }
    }
    Ok(())
}

/// One-line human readable description of a stage
pub fn describe_stage(stage: &StageSpec) -> String {
    match &stage.kind {
        StageKind::Delay(delay) => format!(
            "{} (delay {}ms ± {}ms, negative: {:?})",
            stage.name, delay.base_ms, delay.stddev_ms, delay.negative_delay
        ),
        StageKind::PassThrough => format!("{} (pass-through)", stage.name),
        StageKind::Limit { count } => format!("{} (limit {count})", stage.name),
    }
}
