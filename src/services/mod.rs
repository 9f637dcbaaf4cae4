// サービス層 - 機能別の具象実装
// 作業関数・診断出力・設定をそれぞれ独立して提供する

pub mod config;
pub mod monitoring;
pub mod work;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::{DelayConfig, LineConfig, NegativeDelayPolicy, StageKind, StageSpec};
pub use monitoring::{NoOpReporter, TracingReporter};
pub use work::{DelayStage, FnProcessor, Limit, PassThrough};
