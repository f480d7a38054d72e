//! NodeApi port - ノードバックエンドの抽象化
//!
//! 資格情報の復元・接続・状態取得はすべて外部ライブラリの責務です。
//! このクレートは request/response の境界だけを定義します。
//!
//! # 実装
//! - **InMemoryNodeApi**: 開発・テスト用（impls::inmem_node）

use async_trait::async_trait;

use crate::domain::{Config, Network, NodeCredentials, NodeState};

/// NodeApiError はバックエンドが返すエラー
#[derive(Debug, thiserror::Error)]
pub enum NodeApiError {
    #[error("no node found for this seed")]
    NodeNotFound,

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("not connected")]
    NotConnected,
}

/// NodeApi は外部ノード SDK への request/response 境界
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Recover the credentials of a node previously created from `seed`.
    async fn recover(&self, network: Network, seed: &[u8]) -> Result<NodeCredentials, NodeApiError>;

    /// Attach to the node; returns its current state.
    async fn connect(
        &self,
        config: &Config,
        seed: &[u8],
        credentials: Option<&NodeCredentials>,
    ) -> Result<NodeState, NodeApiError>;

    /// Pull the latest state from the backend.
    async fn node_state(&self) -> Result<NodeState, NodeApiError>;

    async fn disconnect(&self) -> Result<(), NodeApiError>;
}
