// ItemStream - ラインの最終出力

use crate::core::Item;
use tokio::sync::mpsc;

/// ラインの末尾キューの受信側
///
/// 読み進めるとラインが流れる。読むのをやめると上流は満杯のキューで
/// 待機する（バックプレッシャー）。全タスク終了後は`None`を返す。
#[derive(Debug)]
pub struct ItemStream {
    rx: mpsc::Receiver<Item>,
}

impl ItemStream {
    pub(crate) fn new(rx: mpsc::Receiver<Item>) -> Self {
        Self { rx }
    }

    /// 次の製品。ストリームが閉じていればNone
    pub async fn recv(&mut self) -> Option<Item> {
        self.rx.recv().await
    }

    /// 最大n個まで受信する。途中で閉じた場合はそこまで
    pub async fn take(&mut self, n: usize) -> Vec<Item> {
        let mut items = Vec::with_capacity(n);
        while items.len() < n {
            match self.rx.recv().await {
                Some(item) => items.push(item),
                None => break,
            }
        }
        items
    }

    /// ストリームが閉じるまで全て受信する
    pub async fn collect_all(mut self) -> Vec<Item> {
        let mut items = Vec::new();
        while let Some(item) = self.rx.recv().await {
            items.push(item);
        }
        items
    }

    pub fn into_inner(self) -> mpsc::Receiver<Item> {
        self.rx
    }
}
