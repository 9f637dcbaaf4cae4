// ProductionLine - ステージ構成とライフサイクルを管理するオーケストレーター

use super::pipeline::{wire_line, WiredLine};
use super::stream::ItemStream;
use crate::core::{
    CancellationToken, Item, LineError, LineReporter, LineResult, LineState, LineSummary,
    Processor, SourceReport, Stage, StageReport,
};
use crate::services::{NoOpReporter, TracingReporter};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 生産ライン
///
/// `add_stage`で構成し、`start`でソースと各ステージのタスクを起動する。
/// 開始後はステージを追加できず、再開始もできない。
///
/// 状態遷移: Configuring -> Running -> Draining -> Terminated
pub struct ProductionLine {
    verbose: bool,
    stages: Vec<Stage>,
    token: CancellationToken,
    reporter: Option<Arc<dyn LineReporter>>,
    running: Option<RunningLine>,
}

struct RunningLine {
    source: JoinHandle<SourceReport>,
    workers: Vec<JoinHandle<StageReport>>,
    output: Option<mpsc::Receiver<Item>>,
    started_at: Instant,
}

impl RunningLine {
    fn all_finished(&self) -> bool {
        self.source.is_finished() && self.workers.iter().all(JoinHandle::is_finished)
    }

    fn any_finished(&self) -> bool {
        self.source.is_finished() || self.workers.iter().any(JoinHandle::is_finished)
    }
}

impl Default for ProductionLine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductionLine {
    /// 空のラインを作成（verbose無効・専用のキャンセルトークン）
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    /// 外部から渡されたキャンセルトークンでラインを作成
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            verbose: false,
            stages: Vec::new(),
            token,
            reporter: None,
            running: None,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 診断出力の実装を差し替える（verboseより優先）
    pub fn with_reporter(mut self, reporter: Arc<dyn LineReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// ステージを末尾に追加。名前の重複は許可する
    pub fn add_stage<P>(&mut self, name: impl Into<String>, processor: P) -> LineResult<()>
    where
        P: Processor + 'static,
    {
        let name = name.into();
        if self.running.is_some() {
            return Err(LineError::already_started(format!("add_stage({name})")));
        }

        self.stages.push(Stage::new(name, Arc::new(processor)));
        Ok(())
    }

    /// 追加した順のステージ一覧
    pub fn list_stages(&self) -> &[Stage] {
        &self.stages
    }

    /// 全タスクを起動する。ブロックしない
    ///
    /// Tokioランタイム内から呼ぶ必要がある。
    pub fn start(&mut self) -> LineResult<()> {
        if self.running.is_some() {
            return Err(LineError::already_started("start"));
        }
        tokio::runtime::Handle::try_current()
            .map_err(|e| LineError::no_runtime(e.to_string()))?;

        let reporter = self.resolve_reporter();
        let WiredLine {
            source,
            workers,
            output,
        } = wire_line(&self.stages, &self.token, &reporter);

        self.running = Some(RunningLine {
            source,
            workers,
            output: Some(output),
            started_at: Instant::now(),
        });
        Ok(())
    }

    /// 最終出力ストリームを取り出す（1回のみ）
    pub fn items(&mut self) -> LineResult<ItemStream> {
        let running = self
            .running
            .as_mut()
            .ok_or_else(|| LineError::not_started("items"))?;

        // 末尾キューの消費者は1つだけ
        running
            .output
            .take()
            .map(ItemStream::new)
            .ok_or(LineError::OutputTaken)
    }

    /// キャンセルを要求する（冪等）
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn state(&self) -> LineState {
        match &self.running {
            None => LineState::Configuring,
            Some(running) if running.all_finished() => LineState::Terminated,
            Some(running) if self.token.is_cancelled() || running.any_finished() => {
                LineState::Draining
            }
            Some(_) => LineState::Running,
        }
    }

    /// 全タスクの終了を待ち、実行結果を返す
    ///
    /// 出力ストリームを取り出していない場合はここで破棄するため、ラインは自然に止まる。
    /// 取り出したストリームを読まずに保持している場合は、キャンセルするまで戻らない。
    pub async fn wait(self) -> LineResult<LineSummary> {
        let RunningLine {
            source,
            workers,
            output,
            started_at,
        } = self
            .running
            .ok_or_else(|| LineError::not_started("wait"))?;
        drop(output);

        let source = source.await.map_err(LineError::task)?;
        let mut stages = Vec::with_capacity(workers.len());
        for worker in workers {
            stages.push(worker.await.map_err(LineError::task)?);
        }

        Ok(LineSummary {
            source,
            stages,
            total_duration_ms: started_at.elapsed().as_millis(),
        })
    }

    /// キャンセルして全タスクの終了を待つ
    pub async fn shutdown(self) -> LineResult<LineSummary> {
        self.cancel();
        self.wait().await
    }

    fn resolve_reporter(&self) -> Arc<dyn LineReporter> {
        match &self.reporter {
            Some(reporter) => Arc::clone(reporter),
            None if self.verbose => Arc::new(TracingReporter::new()),
            None => Arc::new(NoOpReporter::new()),
        }
    }
}
