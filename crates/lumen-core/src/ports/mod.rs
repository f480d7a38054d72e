//! Ports - 抽象化レイヤー
//!
//! ホストアプリケーション（Listener）と外部ノード SDK（NodeApi）への
//! インターフェースを定義し、実装の詳細を隠蔽します。

pub mod listener;
pub mod node_api;

pub use self::listener::Listener;
pub use self::node_api::{NodeApi, NodeApiError};
