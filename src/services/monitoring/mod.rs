// 診断出力機能
// ステージ起動・キャンセル・終了の報告

pub mod implementations;

// 公開API
pub use implementations::{NoOpReporter, TracingReporter};
