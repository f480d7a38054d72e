//! InMemoryNodeApi - 開発用のノードバックエンド
//!
//! # 学習ポイント
//! - port（NodeApi）の差し替えによるテスト容易性
//! - seed からの決定的な node id（本物の鍵導出ではない）
//!
//! 実際のノード管理は外部 SDK の責務なので、ここでは状態遷移だけを模倣します。

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{Config, Network, NodeCredentials, NodeState};
use crate::ports::{NodeApi, NodeApiError};

#[derive(Default)]
struct Inner {
    /// seed -> node state
    nodes: HashMap<Vec<u8>, NodeState>,
    /// 接続中の seed
    connected: Option<Vec<u8>>,
    unavailable: Option<String>,
}

/// InMemoryNodeApi は開発用の NodeApi
///
/// # 使用例
/// ```ignore
/// let api = InMemoryNodeApi::new();
/// api.create_node(&seed);
/// let creds = api.recover(Network::Bitcoin, &seed).await?;
/// ```
#[derive(Default)]
pub struct InMemoryNodeApi {
    inner: Mutex<Inner>,
}

impl InMemoryNodeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node for `seed` so that `recover` finds it. Returns its id.
    pub fn create_node(&self, seed: &[u8]) -> String {
        let mut inner = self.lock();
        let state = inner
            .nodes
            .entry(seed.to_vec())
            .or_insert_with(|| new_node_state(seed));
        state.id.clone()
    }

    /// Move the chain tip of the connected node forward.
    pub fn advance_blocks(&self, blocks: u32) {
        let mut inner = self.lock();
        if let Some(seed) = inner.connected.clone()
            && let Some(state) = inner.nodes.get_mut(&seed)
        {
            state.block_height += blocks;
        }
    }

    /// Make every call fail with `Unavailable(reason)`; `None` restores it.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.lock().unavailable = reason.map(str::to_string);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

fn new_node_state(seed: &[u8]) -> NodeState {
    let key = &seed[..seed.len().min(32)];
    NodeState {
        id: format!("02{}", hex(key)),
        block_height: 800_000,
        max_receivable_msat: 4_000_000_000,
        inbound_liquidity_msats: 4_000_000_000,
        ..NodeState::default()
    }
}

fn check_available(inner: &Inner) -> Result<(), NodeApiError> {
    match &inner.unavailable {
        Some(reason) => Err(NodeApiError::Unavailable(reason.clone())),
        None => Ok(()),
    }
}

#[async_trait]
impl NodeApi for InMemoryNodeApi {
    async fn recover(&self, network: Network, seed: &[u8]) -> Result<NodeCredentials, NodeApiError> {
        let inner = self.lock();
        check_available(&inner)?;
        if !inner.nodes.contains_key(seed) {
            return Err(NodeApiError::NodeNotFound);
        }
        Ok(NodeCredentials {
            device_key: seed[..seed.len().min(32)].to_vec(),
            device_cert: format!("cert:{network:?}").into_bytes(),
        })
    }

    async fn connect(
        &self,
        _config: &Config,
        seed: &[u8],
        _credentials: Option<&NodeCredentials>,
    ) -> Result<NodeState, NodeApiError> {
        let mut inner = self.lock();
        check_available(&inner)?;
        // 未登録の seed は新規ノードとして登録する
        let state = inner
            .nodes
            .entry(seed.to_vec())
            .or_insert_with(|| new_node_state(seed))
            .clone();
        inner.connected = Some(seed.to_vec());
        Ok(state)
    }

    async fn node_state(&self) -> Result<NodeState, NodeApiError> {
        let inner = self.lock();
        check_available(&inner)?;
        let seed = inner.connected.as_ref().ok_or(NodeApiError::NotConnected)?;
        inner
            .nodes
            .get(seed)
            .cloned()
            .ok_or(NodeApiError::NodeNotFound)
    }

    async fn disconnect(&self) -> Result<(), NodeApiError> {
        let mut inner = self.lock();
        match inner.connected.take() {
            Some(_) => Ok(()),
            None => Err(NodeApiError::NotConnected),
        }
    }
}
