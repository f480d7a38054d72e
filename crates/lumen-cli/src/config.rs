//! CLI 設定（TOML ファイル + コマンドライン引数）
//!
//! 優先順位: 引数 / 環境変数 > 設定ファイル > デフォルト

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use lumen_core::domain::GreenlightNodeConfig;
use lumen_core::{Config, EnvironmentType, LogLevel, NodeConfig, default_config};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub env: EnvironmentType,
    pub api_key: Option<String>,
    pub invite_code: Option<String>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
    pub queue_capacity: Option<usize>,
}

/// 引数で上書きできる項目（None は「指定なし」）
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub env: Option<EnvironmentType>,
    pub api_key: Option<String>,
    pub invite_code: Option<String>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(env) = overrides.env {
            self.env = env;
        }
        if overrides.api_key.is_some() {
            self.api_key = overrides.api_key;
        }
        if overrides.invite_code.is_some() {
            self.invite_code = overrides.invite_code;
        }
        if overrides.log_level.is_some() {
            self.log_level = overrides.log_level;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level.unwrap_or(LogLevel::Info)
    }

    pub fn to_sdk_config(&self) -> Config {
        let node_config = NodeConfig::Greenlight {
            config: GreenlightNodeConfig {
                partner_credentials: None,
                invite_code: self.invite_code.clone(),
            },
        };
        let mut config = default_config(self.env, self.api_key.clone().unwrap_or_default(), node_config);
        if self.api_key.is_none() {
            config.api_key = None;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml() {
        let config = CliConfig::parse(
            r#"
            env = "staging"
            log_level = "WARN"
            queue_capacity = 64
            "#,
        )
        .unwrap();
        assert_eq!(config.env, EnvironmentType::Staging);
        assert_eq!(config.log_level(), LogLevel::Warn);
        assert_eq!(config.queue_capacity, Some(64));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn rejects_unknown_env() {
        assert!(CliConfig::parse(r#"env = "dev""#).is_err());
    }

    #[test]
    fn overrides_win_over_file() {
        let mut config = CliConfig {
            env: EnvironmentType::Staging,
            api_key: Some("from-file".to_string()),
            ..CliConfig::default()
        };
        config.apply(Overrides {
            env: Some(EnvironmentType::Production),
            log_level: Some(LogLevel::Debug),
            ..Overrides::default()
        });
        assert_eq!(config.env, EnvironmentType::Production);
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn sdk_config_carries_pass_through_fields() {
        let config = CliConfig {
            env: EnvironmentType::Staging,
            invite_code: Some("abc".to_string()),
            ..CliConfig::default()
        };
        let sdk = config.to_sdk_config();
        assert_eq!(sdk.env, EnvironmentType::Staging);
        assert_eq!(sdk.api_key, None);
        let NodeConfig::Greenlight { config: gl } = sdk.node_config;
        assert_eq!(gl.invite_code.as_deref(), Some("abc"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lumen.toml");
        fs::write(&path, "api_key = \"k\"\n").unwrap();
        assert_eq!(CliConfig::load(&path).unwrap().api_key.as_deref(), Some("k"));
        assert!(CliConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
