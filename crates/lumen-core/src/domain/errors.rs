use thiserror::Error;

pub type SdkResult<T, E = SdkError> = Result<T, E>;

/// SdkError は upstream 操作のエラー
///
/// # 分類
/// - Input: 呼び出し側の入力が不正（mnemonic の形式など）
/// - Connection: バックエンドとのセッション確立・復元に失敗
/// - State: 未接続 / 切断済みのセッションに対する操作
///
/// Sink の配送経路はこの型を返しません（listener の失敗は producer に伝播しない）。
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid input: {0}")]
    Input(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("invalid state: {0}")]
    State(String),
}

impl SdkError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }
}
