// FnProcessor - クロージャを作業関数として使うためのアダプター

use crate::core::{Item, Processor, WorkOutcome};
use async_trait::async_trait;

/// 同期クロージャをラップした作業関数
pub struct FnProcessor<F> {
    work: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(Item) -> WorkOutcome + Send + Sync,
{
    pub fn new(work: F) -> Self {
        Self { work }
    }
}

#[async_trait]
impl<F> Processor for FnProcessor<F>
where
    F: Fn(Item) -> WorkOutcome + Send + Sync,
{
    async fn process(&self, item: Item) -> WorkOutcome {
        (self.work)(item)
    }

    fn kind(&self) -> &'static str {
        "fn"
    }
}
