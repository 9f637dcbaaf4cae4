// 診断出力の具象実装

use crate::core::{LineReporter, SourceReport, StageReport};
use tracing::{debug, info};

/// tracingによる診断出力（verbose時に使用）
#[derive(Debug, Default, Clone)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl LineReporter for TracingReporter {
    fn stage_started(&self, index: usize, name: &str) {
        info!(stage = name, index, "Starting stage: {name}");
    }

    fn source_cancelled(&self, emitted: u64) {
        info!(emitted, "first stage cancelled!");
    }

    fn stage_cancelled(&self, name: &str, received: u64) {
        info!(stage = name, received, "worker cancelled!");
    }

    fn source_finished(&self, report: &SourceReport) {
        debug!(emitted = report.emitted, exit = ?report.exit, "source finished");
    }

    fn stage_finished(&self, report: &StageReport) {
        debug!(
            stage = %report.name,
            index = report.index,
            received = report.received,
            emitted = report.emitted,
            discarded = report.discarded,
            exit = ?report.exit,
            "stage finished"
        );
    }
}

/// 何もしない診断出力（デフォルト）
#[derive(Debug, Default, Clone)]
pub struct NoOpReporter;

impl NoOpReporter {
    pub fn new() -> Self {
        Self
    }
}

impl LineReporter for NoOpReporter {
    fn stage_started(&self, _index: usize, _name: &str) {}

    fn source_cancelled(&self, _emitted: u64) {}

    fn stage_cancelled(&self, _name: &str, _received: u64) {}

    fn source_finished(&self, _report: &SourceReport) {}

    fn stage_finished(&self, _report: &StageReport) {}
}
