// PassThrough - 何もせずに流す作業関数

use crate::core::{Item, Processor, WorkOutcome};
use async_trait::async_trait;

/// 受け取った製品をそのまま下流へ流す
#[derive(Debug, Default, Clone)]
pub struct PassThrough;

impl PassThrough {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Processor for PassThrough {
    async fn process(&self, item: Item) -> WorkOutcome {
        WorkOutcome::Emit(item)
    }

    fn kind(&self) -> &'static str {
        "pass_through"
    }
}
