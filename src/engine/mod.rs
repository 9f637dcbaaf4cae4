// エンジン層 - ラインの配線・並行実行・ライフサイクル
// コア層の型とサービス層の作業関数を組み合わせて生産ラインを動かす

pub mod api;
mod pipeline;
pub mod producer;
pub mod production_line;
pub mod stream;
pub mod worker;

// 公開API
pub use api::{drive, run_for};
pub use pipeline::QUEUE_CAPACITY;
pub use production_line::ProductionLine;
pub use stream::ItemStream;
