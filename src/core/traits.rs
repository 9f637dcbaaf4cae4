// 生産ラインのトレイト定義
// 作業関数と診断出力の抽象化インターフェース

use super::types::{Item, SourceReport, StageReport, WorkOutcome};
use async_trait::async_trait;
use mockall::automock;

/// ステージで行う作業の抽象化トレイト
///
/// 1つの製品を受け取り、必要なら待機したうえで結果を返す。
/// 遅延はキャンセルで中断されない。
#[automock]
#[async_trait]
pub trait Processor: Send + Sync {
    /// 製品1つ分の作業
    async fn process(&self, item: Item) -> WorkOutcome;

    /// ログ用の作業種別
    fn kind(&self) -> &'static str;
}

// Processor for Box<dyn Processor>
#[async_trait]
impl Processor for Box<dyn Processor> {
    async fn process(&self, item: Item) -> WorkOutcome {
        self.as_ref().process(item).await
    }

    fn kind(&self) -> &'static str {
        self.as_ref().kind()
    }
}

/// ラインの診断出力を抽象化するトレイト
///
/// verboseフラグで実装を切り替える。ラインの動作には影響しない。
#[automock]
pub trait LineReporter: Send + Sync {
    /// ステージのタスク起動時
    fn stage_started(&self, index: usize, name: &str);

    /// ソースがキャンセルを検知した時
    fn source_cancelled(&self, emitted: u64);

    /// ステージがキャンセルを検知した時
    fn stage_cancelled(&self, name: &str, received: u64);

    /// ソース終了時
    fn source_finished(&self, report: &SourceReport);

    /// ステージ終了時
    fn stage_finished(&self, report: &StageReport);
}
