//! Events - ドメインイベント
//!
//! SDK ランタイムの状態変化（接続、同期、支払いなど）を表すイベント。
//! Sink はペイロードを解釈せず、そのまま Listener に渡します。

use serde::{Deserialize, Serialize};

use super::node::SessionId;

/// SdkEvent はランタイムで発生したイベント
///
/// # 配送
/// - フィルタなしで常に配送される（ログとは違いレベルを持たない）
/// - 同じ種類のイベント同士は発生順に届く
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SdkEvent {
    /// A session with the node backend was established.
    Connected { session_id: SessionId },
    /// The session was closed by the host.
    Disconnected { session_id: SessionId },
    /// A new block was observed.
    NewBlock { block: u32 },
    /// An incoming invoice was paid.
    InvoicePaid { details: InvoicePaidDetails },
    /// Local state caught up with the backend.
    Synced,
    PaymentSucceed { details: Payment },
    PaymentFailed { details: PaymentFailedData },
    BackupStarted,
    BackupSucceeded,
    BackupFailed { details: BackupFailedData },
}

impl SdkEvent {
    /// Short stable name, used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            SdkEvent::Connected { .. } => "connected",
            SdkEvent::Disconnected { .. } => "disconnected",
            SdkEvent::NewBlock { .. } => "new_block",
            SdkEvent::InvoicePaid { .. } => "invoice_paid",
            SdkEvent::Synced => "synced",
            SdkEvent::PaymentSucceed { .. } => "payment_succeed",
            SdkEvent::PaymentFailed { .. } => "payment_failed",
            SdkEvent::BackupStarted => "backup_started",
            SdkEvent::BackupSucceeded => "backup_succeeded",
            SdkEvent::BackupFailed { .. } => "backup_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePaidDetails {
    pub payment_hash: String,
    pub bolt11: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount_msat: u64,
    pub fee_msat: u64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFailedData {
    pub error: String,
    pub node_id: String,
    pub invoice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupFailedData {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = SdkEvent::NewBlock { block: 812_000 };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({ "type": "new_block", "block": 812_000 }));

        let unit = serde_json::to_value(SdkEvent::Synced).unwrap();
        assert_eq!(unit, json!({ "type": "synced" }));
    }

    #[test]
    fn payload_passes_through_unchanged() {
        let event = SdkEvent::PaymentFailed {
            details: PaymentFailedData {
                error: "route not found".to_string(),
                node_id: "02ab".to_string(),
                invoice: None,
            },
        };
        let cloned = event.clone();
        assert_eq!(event, cloned);
        assert_eq!(cloned.name(), "payment_failed");
    }
}
