// 生産ラインシミュレーター
// ソース -> ステージ... -> 出力 を容量1のキューで繋ぎ、各ステージを並行に動かす

pub mod cli;
pub mod core;
pub mod engine;
pub mod services;

// 主要な型の再エクスポート
pub use core::{
    CancellationToken, ExitReason, Item, LineError, LineReporter, LineResult, LineState,
    LineSummary, Processor, SourceReport, Stage, StageReport, WorkOutcome,
};
pub use engine::{drive, run_for, ItemStream, ProductionLine, QUEUE_CAPACITY};
pub use services::{
    DelayConfig, DelayStage, FnProcessor, Limit, LineConfig, NegativeDelayPolicy, NoOpReporter,
    PassThrough, StageKind, StageSpec, TracingReporter,
};
