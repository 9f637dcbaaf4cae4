// Producer - ラインの0番目のステージ（製品の採番と投入）

use crate::core::{CancellationToken, ExitReason, Item, LineReporter, SourceReport};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Source: 0から連番の製品を出力キューへ投入し続ける
///
/// 終了条件はキャンセル、下流キューのクローズ、ID空間の枯渇のいずれか。
/// 終了時にoutputをドロップしてストリーム終了を下流へ伝える。
pub fn spawn_source(
    token: CancellationToken,
    output: mpsc::Sender<Item>,
    reporter: Arc<dyn LineReporter>,
) -> tokio::task::JoinHandle<SourceReport> {
    tokio::spawn(async move {
        let mut next = Some(Item::new(0));
        let mut emitted = 0u64;

        let exit = loop {
            // 毎回まず非ブロッキングでキャンセルを確認
            if token.is_cancelled() {
                reporter.source_cancelled(emitted);
                break ExitReason::Cancelled;
            }

            let Some(item) = next else {
                break ExitReason::Exhausted;
            };

            // キューが満杯の間もキャンセルで送信を中断できるようにする
            let sent = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                result = output.send(item) => Some(result.is_ok()),
            };

            match sent {
                Some(true) => {
                    emitted += 1;
                    next = item.next();
                }
                // 下流がキャンセルを先に検知して閉じた場合もキャンセル扱い
                _ if token.is_cancelled() => {
                    reporter.source_cancelled(emitted);
                    break ExitReason::Cancelled;
                }
                _ => break ExitReason::DownstreamClosed,
            }
        };

        drop(output);

        let report = SourceReport { emitted, exit };
        reporter.source_finished(&report);
        report
    })
}
