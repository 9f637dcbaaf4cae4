// 高レベル公開API
// ProductionLineの起動・消費・停止をまとめて行う便利な関数

use super::ProductionLine;
use crate::core::{Item, LineResult, LineSummary};
use std::future::Future;
use std::time::Duration;

/// ラインを起動し、`stop`が完了するまで出力を`on_item`に渡し続ける
///
/// `stop`が完了したらキャンセルし、ストリームが閉じるまで読み切ってから
/// 全タスクの終了を待つ。`stop`より先にラインが自然終了した場合はそのまま戻る。
pub async fn drive<S, F>(mut line: ProductionLine, stop: S, mut on_item: F) -> LineResult<LineSummary>
where
    S: Future<Output = ()>,
    F: FnMut(Item),
{
    line.start()?;
    let mut stream = line.items()?;
    let token = line.token().clone();

    tokio::pin!(stop);
    let mut stopped = false;

    loop {
        tokio::select! {
            biased;
            _ = &mut stop, if !stopped => {
                stopped = true;
                token.cancel();
            }
            item = stream.recv() => match item {
                Some(item) => on_item(item),
                None => break,
            },
        }
    }

    line.wait().await
}

/// 指定時間だけラインを動かし、受け取った製品と実行結果を返す
pub async fn run_for(line: ProductionLine, duration: Duration) -> LineResult<(Vec<Item>, LineSummary)> {
    let mut items = Vec::new();
    let summary = drive(line, tokio::time::sleep(duration), |item| items.push(item)).await?;
    Ok((items, summary))
}
