// Limit - 指定数だけ流してからストリームを閉じる作業関数

use crate::core::{Item, Processor, WorkOutcome};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// 最初のn個を流し、n+1個目を受け取った時点で出力を閉じる
#[derive(Debug)]
pub struct Limit {
    remaining: AtomicU64,
}

impl Limit {
    pub fn new(count: u64) -> Self {
        Self {
            remaining: AtomicU64::new(count),
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Processor for Limit {
    async fn process(&self, item: Item) -> WorkOutcome {
        let taken = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |left| left.checked_sub(1));

        match taken {
            Ok(_) => WorkOutcome::Emit(item),
            Err(_) => WorkOutcome::EndOfStream,
        }
    }

    fn kind(&self) -> &'static str {
        "limit"
    }
}
