// コア層 - 型・トレイト・エラー・キャンセル
// エンジン層とサービス層が共通で依存する定義

pub mod cancellation;
pub mod error;
pub mod traits;
pub mod types;

pub use cancellation::CancellationToken;
pub use error::{LineError, LineResult};
pub use traits::{LineReporter, MockLineReporter, MockProcessor, Processor};
pub use types::{
    ExitReason, Item, LineState, LineSummary, SourceReport, Stage, StageReport, WorkOutcome,
};
