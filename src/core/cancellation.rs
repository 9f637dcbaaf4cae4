// キャンセルトークン - 一度きり・冪等・ブロードキャストの停止シグナル

use std::sync::Arc;
use tokio::sync::watch;

/// ラインの全タスクに明示的に渡す停止シグナル
///
/// クローンは同じシグナルを共有する。`is_cancelled`はブロックしない。
#[derive(Debug, Clone)]
pub struct CancellationToken {
    signal: Arc<watch::Sender<bool>>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal: Arc::new(signal),
        }
    }

    /// 停止を要求する。2回目以降は何もしない
    pub fn cancel(&self) {
        self.signal.send_if_modified(|cancelled| {
            let changed = !*cancelled;
            *cancelled = true;
            changed
        });
    }

    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow()
    }

    /// 停止が要求されるまで待機
    pub async fn cancelled(&self) {
        let mut receiver = self.signal.subscribe();
        // 送信側はselfが保持しているので閉じることはない
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}
