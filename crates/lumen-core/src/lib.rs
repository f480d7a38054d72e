//! lumen-core
//!
//! Event & log sink registry for a node SDK facade.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（LogEntry, LogLevel, SdkEvent, Config, NodeState, SdkError）
//! - **ports**: 抽象化レイヤー（Listener, NodeApi）
//! - **sink**: Sink レジストリと dispatch（SinkRegistry, Dispatcher, SinkHandle, SinkLayer）
//! - **impls**: 実装（Console/File/Multi/Channel Listener, InMemoryNodeApi など）
//! - **services**: SDK の入口（SdkServices, mnemonic_to_seed）

pub mod domain;
pub mod impls;
pub mod ports;
pub mod services;
pub mod sink;

pub use domain::{
    Config, EnvironmentType, LogEntry, LogLevel, Network, NodeConfig, NodeState, SdkError,
    SdkEvent, SdkResult, default_config,
};
pub use ports::{Listener, NodeApi};
pub use services::{ConnectRequest, SdkServices, mnemonic_to_seed};
pub use sink::{DEFAULT_CAPACITY, Dispatcher, SinkHandle, SinkLayer};
