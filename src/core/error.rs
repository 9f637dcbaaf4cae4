// 生産ライン固有のエラー型定義
// キャンセルはエラーではなく正常終了経路として扱うため、ここには含めない

use thiserror::Error;

/// 生産ラインのエラー型
#[derive(Error, Debug)]
pub enum LineError {
    /// 開始後に構成を変更しようとした（事前条件違反）
    #[error("生産ラインは既に開始されています: {operation}")]
    AlreadyStarted { operation: String },

    /// 開始前に実行時の操作を呼び出した（事前条件違反）
    #[error("生産ラインがまだ開始されていません: {operation}")]
    NotStarted { operation: String },

    /// 出力ストリームは一度しか取り出せない
    #[error("出力ストリームは既に取り出されています")]
    OutputTaken,

    /// Tokioランタイム外でタスクを起動しようとした
    #[error("Tokioランタイムが見つかりません: {message}")]
    NoRuntime { message: String },

    #[error("設定エラー: {message}")]
    Configuration { message: String },

    #[error("タスクエラー: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl LineError {
    pub fn already_started(operation: impl Into<String>) -> Self {
        Self::AlreadyStarted {
            operation: operation.into(),
        }
    }

    pub fn not_started(operation: impl Into<String>) -> Self {
        Self::NotStarted {
            operation: operation.into(),
        }
    }

    pub fn no_runtime(message: impl Into<String>) -> Self {
        Self::NoRuntime {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }

    /// 呼び出し側の誤用（プログラミングエラー）かどうか
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            Self::AlreadyStarted { .. } | Self::NotStarted { .. } | Self::OutputTaken
        )
    }
}

/// 生産ラインの結果型
pub type LineResult<T> = std::result::Result<T, LineError>;
