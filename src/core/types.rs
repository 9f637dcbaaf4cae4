// 生産ラインの型定義

use super::traits::Processor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// ラインを流れる製品
///
/// ソースが採番した0始まりの連番IDだけを持つ。生成後は不変。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(u64);

impl Item {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u64 {
        self.0
    }

    /// 次の連番。ID空間を使い切った場合はNone
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<u64> for Item {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 作業関数1回分の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOutcome {
    /// 下流へ流す
    Emit(Item),
    /// この製品を破棄して次へ進む
    Discard,
    /// このステージで出力を閉じる
    EndOfStream,
}

/// ラインのステージ（名前付きの作業関数）
///
/// 作業関数はArcで保持し、開始時に各タスクへ共有する。
#[derive(Clone)]
pub struct Stage {
    name: String,
    processor: Arc<dyn Processor>,
}

impl Stage {
    pub fn new(name: impl Into<String>, processor: Arc<dyn Processor>) -> Self {
        Self {
            name: name.into(),
            processor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn processor(&self) -> &dyn Processor {
        self.processor.as_ref()
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("kind", &self.processor.kind())
            .finish()
    }
}

/// ラインのライフサイクル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineState {
    Configuring,
    Running,
    Draining,
    Terminated,
}

/// タスクの終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// 入力キューが閉じられ、空になった
    Completed,
    /// キャンセルを検知した
    Cancelled,
    /// 下流のキューが閉じられた
    DownstreamClosed,
    /// 作業関数がストリーム終了を返した
    EndOfStream,
    /// ソースのID空間を使い切った
    Exhausted,
}

/// ソースの実行結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub emitted: u64,
    pub exit: ExitReason,
}

/// ステージの実行結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub index: usize,
    pub name: String,
    pub received: u64,
    pub emitted: u64,
    pub discarded: u64,
    pub exit: ExitReason,
}

/// ライン全体の実行結果
#[derive(Debug, Clone, Serialize)]
pub struct LineSummary {
    pub source: SourceReport,
    pub stages: Vec<StageReport>,
    pub total_duration_ms: u128,
}

impl LineSummary {
    /// 名前が最初に一致したステージの結果
    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|stage| stage.name == name)
    }

    /// 末尾キューへ送り出された製品数
    ///
    /// 消費者がまだ読んでいない（読まれずに残った）製品も含む。
    /// ストリームを閉じるまで読み切った場合は受信数と一致する。
    pub fn delivered(&self) -> u64 {
        self.stages
            .last()
            .map(|stage| stage.emitted)
            .unwrap_or(self.source.emitted)
    }
}
