//! Config - SDK 接続設定
//!
//! 環境（production / staging）ごとのデフォルトと、
//! パートナー資格情報・招待コードなどの pass-through フィールド。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// EnvironmentType は接続先環境の選択
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentType {
    #[default]
    Production,
    Staging,
}

impl fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentType::Production => f.write_str("production"),
            EnvironmentType::Staging => f.write_str("staging"),
        }
    }
}

impl FromStr for EnvironmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(EnvironmentType::Production),
            "staging" => Ok(EnvironmentType::Staging),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Bitcoin network the node runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    #[default]
    Bitcoin,
    Testnet,
    Signet,
    Regtest,
}

/// Partner credentials for node registration. Opaque to this crate.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerCredentials {
    pub device_key: Vec<u8>,
    pub device_cert: Vec<u8>,
}

impl fmt::Debug for PartnerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PartnerCredentials(..)")
    }
}

/// Greenlight 固有の設定
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GreenlightNodeConfig {
    pub partner_credentials: Option<PartnerCredentials>,
    pub invite_code: Option<String>,
}

/// NodeConfig はノード実装ごとの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeConfig {
    Greenlight { config: GreenlightNodeConfig },
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig::Greenlight {
            config: GreenlightNodeConfig::default(),
        }
    }
}

/// Config は SDK セッション全体の設定
///
/// `Config::production()` / `Config::staging()` がデフォルト値を持ちます。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub env: EnvironmentType,
    pub breezserver: String,
    pub mempoolspace_url: String,
    pub working_dir: String,
    pub network: Network,
    pub payment_timeout_sec: u32,
    pub default_lsp_id: Option<String>,
    pub api_key: Option<String>,
    pub maxfee_percent: f64,
    pub node_config: NodeConfig,
}

impl Config {
    pub fn production() -> Self {
        Self {
            env: EnvironmentType::Production,
            breezserver: "https://bs1.breez.technology:443".to_string(),
            mempoolspace_url: "https://mempool.space".to_string(),
            working_dir: ".".to_string(),
            network: Network::Bitcoin,
            payment_timeout_sec: 60,
            default_lsp_id: Some("03cea51f-b654-4fb0-8e82-eca137f236a0".to_string()),
            api_key: None,
            maxfee_percent: 0.5,
            node_config: NodeConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            env: EnvironmentType::Staging,
            breezserver: "https://bs1-st.breez.technology:443".to_string(),
            default_lsp_id: Some("ea51d025-042d-456c-8325-63e430797481".to_string()),
            ..Self::production()
        }
    }
}

/// 環境ごとのデフォルト設定に api_key と node_config を差し込む
pub fn default_config(env: EnvironmentType, api_key: String, node_config: NodeConfig) -> Config {
    let mut config = match env {
        EnvironmentType::Production => Config::production(),
        EnvironmentType::Staging => Config::staging(),
    };
    config.api_key = Some(api_key);
    config.node_config = node_config;
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_overrides_server_only() {
        let prod = Config::production();
        let staging = Config::staging();
        assert_ne!(prod.breezserver, staging.breezserver);
        assert_eq!(prod.mempoolspace_url, staging.mempoolspace_url);
        assert_eq!(staging.env, EnvironmentType::Staging);
    }

    #[test]
    fn default_config_fills_pass_through_fields() {
        let node_config = NodeConfig::Greenlight {
            config: GreenlightNodeConfig {
                partner_credentials: None,
                invite_code: Some("invite".to_string()),
            },
        };
        let config = default_config(EnvironmentType::Staging, "code".to_string(), node_config.clone());
        assert_eq!(config.api_key.as_deref(), Some("code"));
        assert_eq!(config.node_config, node_config);
        assert_eq!(config.env, EnvironmentType::Staging);
    }

    #[test]
    fn environment_parses_from_cli_names() {
        assert_eq!("prod".parse::<EnvironmentType>().unwrap(), EnvironmentType::Production);
        assert_eq!("STAGING".parse::<EnvironmentType>().unwrap(), EnvironmentType::Staging);
        assert!("dev".parse::<EnvironmentType>().is_err());
    }
}
