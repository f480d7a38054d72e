//! SdkServices - SDK の入口（facade）
//!
//! upstream 操作（seed 導出・復元・接続・node_info）はすべて外部への pass-through。
//! このモジュールが持つロジックは入力検証、エラー分類、イベント発行だけです。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bip39::{Language, Mnemonic};
use tracing::{debug, info, warn};

use crate::domain::{
    Config, Network, NodeCredentials, NodeState, SdkError, SdkEvent, SdkResult, SessionId,
};
use crate::ports::{NodeApi, NodeApiError};
use crate::sink::SinkHandle;

const MIN_SEED_LEN: usize = 16;
const MAX_SEED_LEN: usize = 64;

/// Derive the 64-byte BIP-39 seed (empty passphrase) from an English phrase.
///
/// 不正な phrase は `SdkError::Input` になる（空の seed を返すことはない）。
pub fn mnemonic_to_seed(phrase: &str) -> SdkResult<Vec<u8>> {
    let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|e| SdkError::input(format!("invalid mnemonic: {e}")))?;
    Ok(mnemonic.to_seed_normalized("").to_vec())
}

fn validate_seed(seed: &[u8]) -> SdkResult<()> {
    if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
        return Err(SdkError::input(format!(
            "seed must be {MIN_SEED_LEN} to {MAX_SEED_LEN} bytes, got {}",
            seed.len()
        )));
    }
    Ok(())
}

fn map_api_error(op: &str, err: NodeApiError) -> SdkError {
    match err {
        NodeApiError::NotConnected => SdkError::state(format!("{op}: {err}")),
        other => SdkError::connection(format!("{op}: {other}")),
    }
}

/// ConnectRequest は connect に必要な入力一式
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    pub config: Config,
    pub seed: Vec<u8>,
    /// `recover_node` の結果があれば渡す
    pub credentials: Option<NodeCredentials>,
}

/// SdkServices は 1 セッション分の handle
///
/// # ライフサイクル
/// 1. `connect()` で生成（Connected → Synced を発行）
/// 2. `node_info()` / `sync()` で状態取得
/// 3. `disconnect()` で終了（Disconnected を発行）。以降の操作は `SdkError::State`
pub struct SdkServices {
    config: Config,
    session_id: SessionId,
    node_api: Arc<dyn NodeApi>,
    sink: SinkHandle,
    last_state: Mutex<NodeState>,
    connected: AtomicBool,
}

impl SdkServices {
    /// Recover the credentials of an existing node.
    pub async fn recover_node(
        node_api: &dyn NodeApi,
        network: Network,
        seed: &[u8],
    ) -> SdkResult<NodeCredentials> {
        validate_seed(seed)?;
        let credentials = node_api
            .recover(network, seed)
            .await
            .map_err(|e| map_api_error("recover node", e))?;
        info!(?network, "node credentials recovered");
        Ok(credentials)
    }

    /// Attach to the node and start a session that reports through `sink`.
    pub async fn connect(
        req: ConnectRequest,
        node_api: Arc<dyn NodeApi>,
        sink: SinkHandle,
    ) -> SdkResult<Arc<SdkServices>> {
        validate_seed(&req.seed)?;
        let state = node_api
            .connect(&req.config, &req.seed, req.credentials.as_ref())
            .await
            .map_err(|e| map_api_error("connect", e))?;

        let session_id = SessionId::generate();
        info!(
            %session_id,
            node_id = %state.id,
            env = %req.config.env,
            block_height = state.block_height,
            "connected"
        );
        sink.dispatch_event(SdkEvent::Connected { session_id });
        sink.dispatch_event(SdkEvent::Synced);

        Ok(Arc::new(SdkServices {
            config: req.config,
            session_id,
            node_api,
            sink,
            last_state: Mutex::new(state),
            connected: AtomicBool::new(true),
        }))
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sink(&self) -> &SinkHandle {
        &self.sink
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Last known node state (as of connect or the latest `sync`).
    pub fn node_info(&self) -> SdkResult<NodeState> {
        self.ensure_connected()?;
        Ok(self.last_state.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    /// Pull fresh state from the backend and emit `NewBlock` / `Synced`.
    pub async fn sync(&self) -> SdkResult<NodeState> {
        self.ensure_connected()?;
        let state = self
            .node_api
            .node_state()
            .await
            .map_err(|e| map_api_error("sync", e))?;

        let previous_height = {
            let mut last = self.last_state.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *last, state.clone()).block_height
        };
        if state.block_height > previous_height {
            self.sink.dispatch_event(SdkEvent::NewBlock {
                block: state.block_height,
            });
        }
        self.sink.dispatch_event(SdkEvent::Synced);
        debug!(block_height = state.block_height, "sync completed");
        Ok(state)
    }

    /// End the session. A second call fails with `SdkError::State`.
    pub async fn disconnect(&self) -> SdkResult<()> {
        if !self.connected.swap(false, Ordering::SeqCst) {
            return Err(SdkError::state("session already disconnected"));
        }
        // backend 側の失敗はセッション終了を妨げない
        if let Err(e) = self.node_api.disconnect().await {
            warn!(error = %e, "backend disconnect failed");
        }
        self.sink.dispatch_event(SdkEvent::Disconnected {
            session_id: self.session_id,
        });
        info!(session_id = %self.session_id, "disconnected");
        Ok(())
    }

    fn ensure_connected(&self) -> SdkResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(SdkError::state("session is not connected"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogLevel;
    use crate::impls::{InMemoryNodeApi, RecordingListener};
    use crate::sink::{DEFAULT_CAPACITY, Dispatcher, SinkLayer};
    use rstest::rstest;
    use tracing_subscriber::layer::SubscriberExt;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn request(seed: Vec<u8>) -> ConnectRequest {
        ConnectRequest {
            config: Config::production(),
            seed,
            credentials: None,
        }
    }

    #[test]
    fn mnemonic_to_seed_derives_64_bytes() {
        let seed = mnemonic_to_seed(PHRASE).unwrap();
        assert_eq!(seed.len(), 64);
        assert_eq!(&seed[..4], &[0x5e, 0xb0, 0x0b, 0xbd]);

        // 余分な空白や大文字は正規化される
        let spaced = format!("  {}  ", PHRASE.to_uppercase().replace(' ', "   "));
        assert_eq!(mnemonic_to_seed(&spaced).unwrap(), seed);
    }

    #[rstest]
    #[case::empty("")]
    #[case::short("abandon abandon abandon")]
    #[case::unknown_word("abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon lumenx")]
    #[case::bad_checksum("abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon")]
    fn malformed_mnemonic_is_input_error(#[case] phrase: &str) {
        let err = mnemonic_to_seed(phrase).unwrap_err();
        assert!(matches!(err, SdkError::Input(_)));
        assert!(err.to_string().starts_with("invalid input: invalid mnemonic"));
    }

    #[tokio::test]
    async fn connect_emits_connected_then_synced() {
        let dispatcher = Dispatcher::spawn(DEFAULT_CAPACITY);
        let sink = dispatcher.handle();
        let listener = Arc::new(RecordingListener::new());
        sink.set_log_stream(listener.clone(), None);

        let seed = mnemonic_to_seed(PHRASE).unwrap();
        let api = Arc::new(InMemoryNodeApi::new());
        let expected_id = api.create_node(&seed);

        let services = SdkServices::connect(request(seed), api, sink.clone()).await.unwrap();
        sink.flush().await;

        assert_eq!(services.node_info().unwrap().id, expected_id);
        assert_eq!(
            listener.events(),
            vec![
                SdkEvent::Connected {
                    session_id: services.session_id()
                },
                SdkEvent::Synced
            ]
        );
    }

    #[tokio::test]
    async fn connection_failure_is_reported_and_emits_nothing() {
        let dispatcher = Dispatcher::spawn(DEFAULT_CAPACITY);
        let sink = dispatcher.handle();
        let listener = Arc::new(RecordingListener::new());
        sink.set_log_stream(listener.clone(), None);

        let api = Arc::new(InMemoryNodeApi::new());
        api.set_unavailable(Some("offline"));

        let result = SdkServices::connect(request(vec![1; 64]), api, sink.clone()).await;
        sink.flush().await;

        assert!(matches!(result, Err(SdkError::Connection(msg)) if msg.contains("offline")));
        assert!(listener.events().is_empty());
    }

    #[tokio::test]
    async fn short_seed_is_rejected_before_backend() {
        let dispatcher = Dispatcher::spawn(DEFAULT_CAPACITY);
        let api = Arc::new(InMemoryNodeApi::new());
        let result = SdkServices::connect(request(vec![0; 8]), api, dispatcher.handle()).await;
        assert!(matches!(result, Err(SdkError::Input(_))));
    }

    #[tokio::test]
    async fn recover_unknown_node_is_connection_error() {
        let api = InMemoryNodeApi::new();
        let err = SdkServices::recover_node(&api, Network::Bitcoin, &[4; 64])
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Connection(_)));

        api.create_node(&[4; 64]);
        let creds = SdkServices::recover_node(&api, Network::Bitcoin, &[4; 64])
            .await
            .unwrap();
        assert_eq!(creds.device_key.len(), 32);
    }

    #[tokio::test]
    async fn sync_emits_new_block_when_height_advances() {
        let dispatcher = Dispatcher::spawn(DEFAULT_CAPACITY);
        let sink = dispatcher.handle();
        let listener = Arc::new(RecordingListener::new());

        let api = Arc::new(InMemoryNodeApi::new());
        let services = SdkServices::connect(request(vec![2; 64]), api.clone(), sink.clone())
            .await
            .unwrap();
        let start = services.node_info().unwrap().block_height;

        // connect 時のイベントは登録前に配送しきっておく
        sink.flush().await;
        sink.set_log_stream(listener.clone(), None);
        services.sync().await.unwrap();
        api.advance_blocks(3);
        let state = services.sync().await.unwrap();
        sink.flush().await;

        assert_eq!(state.block_height, start + 3);
        assert_eq!(services.node_info().unwrap().block_height, start + 3);
        assert_eq!(
            listener.events(),
            vec![
                SdkEvent::Synced,
                SdkEvent::NewBlock { block: start + 3 },
                SdkEvent::Synced
            ]
        );
    }

    #[tokio::test]
    async fn operations_after_disconnect_are_state_errors() {
        let dispatcher = Dispatcher::spawn(DEFAULT_CAPACITY);
        let sink = dispatcher.handle();
        let api = Arc::new(InMemoryNodeApi::new());
        let services = SdkServices::connect(request(vec![5; 64]), api, sink.clone())
            .await
            .unwrap();

        services.disconnect().await.unwrap();
        assert!(!services.is_connected());
        assert!(matches!(services.node_info(), Err(SdkError::State(_))));
        assert!(matches!(services.sync().await, Err(SdkError::State(_))));
        assert!(matches!(services.disconnect().await, Err(SdkError::State(_))));
    }

    #[tokio::test]
    async fn internal_logs_reach_the_registered_listener() {
        let dispatcher = Dispatcher::spawn(DEFAULT_CAPACITY);
        let sink = dispatcher.handle();
        let listener = Arc::new(RecordingListener::new());
        sink.set_log_stream(listener.clone(), Some(LogLevel::Info));

        let subscriber = tracing_subscriber::registry().with(SinkLayer::new(sink.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let api = Arc::new(InMemoryNodeApi::new());
        let services = SdkServices::connect(request(vec![6; 64]), api, sink.clone())
            .await
            .unwrap();
        // debug は Info フィルタで落ちる
        services.sync().await.unwrap();
        sink.flush().await;

        let logs = listener.logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].line.starts_with("lumen_core::services - connected"));
        assert_eq!(logs[0].level, "INFO");
        assert_eq!(sink.counts().filtered, 1);
    }
}
