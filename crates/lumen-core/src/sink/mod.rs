//! Sink - Event & Log Sink Registry
//!
//! ランタイム内部のログ／イベント生成側と、ホストアプリケーションの消費ロジックを
//! 1 つの登録先（Listener）で切り離します。
//!
//! # 主要コンポーネント
//! - **SinkRegistry**: 現在の Listener + フィルタを保持する単一スロット
//! - **Dispatcher**: bounded channel と dispatch タスク（配送順の直列化）
//! - **SinkHandle**: producer 側の窓口（登録・dispatch・flush）
//! - **SinkLayer**: tracing イベントを LogEntry に変換するブリッジ

pub mod dispatcher;
pub mod layer;
pub mod registry;
mod stats;

pub use self::dispatcher::{DEFAULT_CAPACITY, Dispatcher, SinkHandle};
pub use self::layer::SinkLayer;
pub use self::registry::{Binding, SinkRegistry};
pub use self::stats::DispatchCounts;
