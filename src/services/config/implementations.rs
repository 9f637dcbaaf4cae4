// 設定管理の具象実装

use crate::core::{CancellationToken, LineError, LineResult, Processor};
use crate::engine::ProductionLine;
use crate::services::work::{DelayStage, Limit, PassThrough};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 参照ラインのステージ名
pub const REFERENCE_STAGES: [&str; 4] = ["baking", "icing", "inscribing", "packaging"];

/// 揺らぎで遅延が負になった場合の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NegativeDelayPolicy {
    /// 0に丸める（待たずに次へ進む）
    #[default]
    Clamp,
    /// 絶対値を使う
    Reflect,
    /// 非負になるまで引き直す（上限を超えたら0）
    Resample,
}

/// 遅延付きステージの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub base_ms: u64,
    pub stddev_ms: u64,
    pub negative_delay: NegativeDelayPolicy,
    pub seed: Option<u64>,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            base_ms: 1000,
            stddev_ms: 200,
            negative_delay: NegativeDelayPolicy::Clamp,
            seed: None,
        }
    }
}

impl DelayConfig {
    pub fn with_base(mut self, base: Duration) -> Self {
        self.base_ms = duration_to_ms(base);
        self
    }

    pub fn with_stddev(mut self, stddev: Duration) -> Self {
        self.stddev_ms = duration_to_ms(stddev);
        self
    }

    pub fn with_negative_delay(mut self, policy: NegativeDelayPolicy) -> Self {
        self.negative_delay = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn base(&self) -> Duration {
        Duration::from_millis(self.base_ms)
    }

    pub fn stddev(&self) -> Duration {
        Duration::from_millis(self.stddev_ms)
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// ステージの作業種別
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageKind {
    Delay(DelayConfig),
    PassThrough,
    Limit { count: u64 },
}

impl StageKind {
    pub fn build(&self) -> Box<dyn Processor> {
        match self {
            Self::Delay(config) => Box::new(DelayStage::from_config(config)),
            Self::PassThrough => Box::new(PassThrough::new()),
            Self::Limit { count } => Box::new(Limit::new(*count)),
        }
    }
}

/// 1ステージ分の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: StageKind,
}

impl StageSpec {
    pub fn new(name: impl Into<String>, kind: StageKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn delay(name: impl Into<String>, config: DelayConfig) -> Self {
        Self::new(name, StageKind::Delay(config))
    }
}

/// ライン全体の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub verbose: bool,
    pub stages: Vec<StageSpec>,
}

impl Default for LineConfig {
    /// 参照ライン: 4ステージ、各1秒±200ms
    fn default() -> Self {
        Self::uniform(REFERENCE_STAGES, &DelayConfig::default())
    }
}

impl LineConfig {
    /// 全ステージに同じ遅延設定を使う
    ///
    /// シードがある場合はステージごとに位置をずらして同じ揺らぎにならないようにする。
    pub fn uniform<I, S>(names: I, delay: &DelayConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stages = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let mut config = delay.clone();
                config.seed = delay.seed.map(|seed| seed.wrapping_add(index as u64));
                StageSpec::delay(name, config)
            })
            .collect();

        Self {
            verbose: false,
            stages,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_stage(mut self, stage: StageSpec) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid line configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("failed to load config file: {}", path.display()))
    }

    pub fn validate(&self) -> LineResult<()> {
        if let Some(index) = self.stages.iter().position(|s| s.name.trim().is_empty()) {
            return Err(LineError::configuration(format!(
                "stage #{index} has an empty name"
            )));
        }
        Ok(())
    }

    /// 設定から未開始のラインを組み立てる
    pub fn build_line(&self, token: CancellationToken) -> LineResult<ProductionLine> {
        self.validate()?;

        let mut line = ProductionLine::with_token(token).with_verbose(self.verbose);
        for stage in &self.stages {
            line.add_stage(stage.name.clone(), stage.kind.build())?;
        }
        Ok(line)
    }
}
