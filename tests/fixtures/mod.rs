// テストユーティリティとモック実装
// 統合テスト共通のステージ実装とヘルパー


// 公開API
pub use mocks::*;

use prodsim::{DelayStage, ItemStream, ProductionLine};
use std::time::Duration;

/// 遅延なしのステージ
pub fn instant_stage() -> DelayStage {
    DelayStage::new(Duration::ZERO, Duration::ZERO)
}

/// 固定遅延のステージを名前順に並べたライン
pub fn fixed_delay_line(names: &[&str], delay: Duration) -> ProductionLine {
    let mut line = ProductionLine::new();
    for name in names {
        line.add_stage(*name, DelayStage::new(delay, Duration::ZERO))
            .unwrap();
    }
    line
}

/// 時間制限付きでn個受信する
pub async fn take_within(stream: &mut ItemStream, n: usize, limit: Duration) -> Vec<u64> {
    tokio::time::timeout(limit, stream.take(n))
        .await
        .expect("stream did not deliver in time")
        .into_iter()
        .map(|item| item.id())
        .collect()
}
