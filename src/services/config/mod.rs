// 設定管理
// ライン構成・遅延モデルの設定とJSONファイルからの読み込み

pub mod implementations;

// 公開API
pub use implementations::{
    DelayConfig, LineConfig, NegativeDelayPolicy, StageKind, StageSpec, REFERENCE_STAGES,
};
