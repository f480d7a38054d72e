//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **Listener**: Noop, Console, File, Multi, Channel, Recording（テスト用）
//! - **InMemoryNodeApi**: 開発用の NodeApi
//!
//! # 本番用実装
//! 本物のノード SDK に繋ぐ NodeApi は別クレートに置く想定です。

pub mod channel;
pub mod console;
pub mod file;
pub mod inmem_node;
pub mod multi;
pub mod noop;
pub mod recording;

pub use self::channel::{ChannelListener, SinkMessage};
pub use self::console::ConsoleListener;
pub use self::file::FileListener;
pub use self::inmem_node::InMemoryNodeApi;
pub use self::multi::MultiListener;
pub use self::noop::NoopListener;
pub use self::recording::RecordingListener;
