//! Node - ノード状態と資格情報
//!
//! バックエンド（`NodeApi`）とやり取りする値オブジェクト。
//! 中身の意味はバックエンド側の責務で、このクレートは運ぶだけです。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// SessionId は 1 回の connect〜disconnect を識別
///
/// ULID なので生成順でソートできます。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(Ulid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Credentials needed to reattach to an existing node.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCredentials {
    pub device_key: Vec<u8>,
    pub device_cert: Vec<u8>,
}

// device_key は秘密なので Debug に出さない
impl fmt::Debug for NodeCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCredentials")
            .field("device_key", &format_args!("<{} bytes>", self.device_key.len()))
            .field("device_cert", &format_args!("<{} bytes>", self.device_cert.len()))
            .finish()
    }
}

/// Snapshot of the node as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeState {
    pub id: String,
    pub block_height: u32,
    pub channels_balance_msat: u64,
    pub onchain_balance_msat: u64,
    pub max_payable_msat: u64,
    pub max_receivable_msat: u64,
    pub inbound_liquidity_msats: u64,
    #[serde(default)]
    pub connected_peers: Vec<String>,
}
