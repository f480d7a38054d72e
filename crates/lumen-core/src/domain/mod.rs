//! Domain model (log entries, events, config, node state, errors).

pub mod config;
pub mod errors;
pub mod events;
pub mod log;
pub mod node;

pub use self::config::{
    Config, EnvironmentType, GreenlightNodeConfig, Network, NodeConfig, PartnerCredentials,
    default_config,
};
pub use self::errors::{SdkError, SdkResult};
pub use self::events::{
    BackupFailedData, InvoicePaidDetails, Payment, PaymentFailedData, SdkEvent,
};
pub use self::log::{LogEntry, LogLevel, ParseLevelError};
pub use self::node::{NodeCredentials, NodeState, SessionId};
