// Pipeline - キューの確保とタスクの配線

use super::{producer::spawn_source, worker::spawn_stage_worker};
use crate::core::{CancellationToken, Item, LineReporter, SourceReport, Stage, StageReport};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// ステージ間キューの容量
pub const QUEUE_CAPACITY: usize = 1;

/// 配線済みのライン: 起動済みタスクのハンドルと末尾キュー
pub(crate) struct WiredLine {
    pub source: JoinHandle<SourceReport>,
    pub workers: Vec<JoinHandle<StageReport>>,
    pub output: mpsc::Receiver<Item>,
}

/// source -> stage1 -> ... -> output の順に配線してタスクを起動する
///
/// Tokioランタイム内から呼ぶこと。
pub(crate) fn wire_line(
    stages: &[Stage],
    token: &CancellationToken,
    reporter: &Arc<dyn LineReporter>,
) -> WiredLine {
    let (source_tx, mut prev) = mpsc::channel::<Item>(QUEUE_CAPACITY);
    let source = spawn_source(token.clone(), source_tx, Arc::clone(reporter));

    let mut workers = Vec::with_capacity(stages.len());
    for (index, stage) in stages.iter().enumerate() {
        let (tx, rx) = mpsc::channel::<Item>(QUEUE_CAPACITY);
        reporter.stage_started(index, stage.name());
        workers.push(spawn_stage_worker(
            index,
            stage.clone(),
            token.clone(),
            prev,
            tx,
            Arc::clone(reporter),
        ));
        prev = rx;
    }

    WiredLine {
        source,
        workers,
        output: prev,
    }
}
