// Worker - ステージ1つ分の実行ループ

use crate::core::{
    CancellationToken, ExitReason, Item, LineReporter, Stage, StageReport, WorkOutcome,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// 単一ステージのワーカー
///
/// 入力キューから1つ受け取り、キャンセルを確認してから作業関数を呼び、
/// 結果を出力キューへ送る。作業中の遅延はキャンセルで中断しない。
pub fn spawn_stage_worker(
    index: usize,
    stage: Stage,
    token: CancellationToken,
    mut input: mpsc::Receiver<Item>,
    output: mpsc::Sender<Item>,
    reporter: Arc<dyn LineReporter>,
) -> tokio::task::JoinHandle<StageReport> {
    tokio::spawn(async move {
        let mut received = 0u64;
        let mut emitted = 0u64;
        let mut discarded = 0u64;

        let exit = loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                next = input.recv() => Some(next),
            };

            let item = match next {
                Some(Some(item)) => item,
                // 上流がキャンセルで先に抜けた場合もキャンセル扱い
                _ if token.is_cancelled() => {
                    reporter.stage_cancelled(stage.name(), received);
                    break ExitReason::Cancelled;
                }
                // 上流が閉じて空になった: 正常終了として下流へ伝播
                _ => break ExitReason::Completed,
            };
            received += 1;

            // 受け取った製品は流さずに終了する
            if token.is_cancelled() {
                reporter.stage_cancelled(stage.name(), received);
                break ExitReason::Cancelled;
            }

            match stage.processor().process(item).await {
                WorkOutcome::Emit(done) => {
                    let sent = tokio::select! {
                        biased;
                        _ = token.cancelled() => None,
                        result = output.send(done) => Some(result.is_ok()),
                    };
                    match sent {
                        Some(true) => emitted += 1,
                        _ if token.is_cancelled() => {
                            reporter.stage_cancelled(stage.name(), received);
                            break ExitReason::Cancelled;
                        }
                        _ => break ExitReason::DownstreamClosed,
                    }
                }
                WorkOutcome::Discard => discarded += 1,
                WorkOutcome::EndOfStream => break ExitReason::EndOfStream,
            }
        };

        // 出力を閉じて下流に終了を、入力を閉じて上流に停止を伝える
        drop(output);
        drop(input);

        let report = StageReport {
            index,
            name: stage.name().to_string(),
            received,
            emitted,
            discarded,
            exit,
        };
        reporter.stage_finished(&report);
        report
    })
}
