//! Log - ログ行とレベル
//!
//! SDK ランタイムが出力する 1 行のログ（`LogEntry`）と、
//! フィルタに使う順序付きレベル（`LogLevel`）を定義します。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// LogLevel はログの重要度
///
/// # 順序
/// `Trace < Debug < Info < Warn < Error`
///
/// フィルタは「閾値以上」を通すので、`Ord` の向きがそのまま意味になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// `self` を閾値としたとき `level` が通過するか
    pub fn allows(&self, level: LogLevel) -> bool {
        level >= *self
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown level name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}'")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<&tracing::Level> for LogLevel {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

/// LogEntry は 1 行の診断メッセージ
///
/// ランタイムが構築し、Listener が消費します。構築後は変更しません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub line: String,
    pub level: String,
}

impl LogEntry {
    pub fn new(line: impl Into<String>, level: LogLevel) -> Self {
        Self {
            line: line.into(),
            level: level.as_str().to_string(),
        }
    }

    /// フィルタ判定用のレベル
    ///
    /// 解釈できない level 文字列は `Info` 扱い（エントリ自体はそのまま配送する）。
    pub fn severity(&self) -> LogLevel {
        self.level.parse().unwrap_or(LogLevel::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn levels_are_ordered_from_trace_to_error() {
        let mut sorted = LogLevel::ALL;
        sorted.sort();
        assert_eq!(sorted, LogLevel::ALL);
        assert!(LogLevel::Trace < LogLevel::Error);
    }

    #[rstest]
    #[case::upper("WARN", LogLevel::Warn)]
    #[case::lower("warn", LogLevel::Warn)]
    #[case::long("Warning", LogLevel::Warn)]
    #[case::padded(" info ", LogLevel::Info)]
    #[case::trace("trace", LogLevel::Trace)]
    fn parse_level_names(#[case] input: &str, #[case] expected: LogLevel) {
        assert_eq!(input.parse::<LogLevel>().unwrap(), expected);
    }

    #[test]
    fn parse_rejects_unknown_name() {
        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown log level 'loud'");
    }

    #[rstest]
    #[case(LogLevel::Warn, LogLevel::Trace, false)]
    #[case(LogLevel::Warn, LogLevel::Info, false)]
    #[case(LogLevel::Warn, LogLevel::Warn, true)]
    #[case(LogLevel::Warn, LogLevel::Error, true)]
    #[case(LogLevel::Trace, LogLevel::Trace, true)]
    fn threshold_allows_same_or_higher(
        #[case] threshold: LogLevel,
        #[case] level: LogLevel,
        #[case] allowed: bool,
    ) {
        assert_eq!(threshold.allows(level), allowed);
    }

    #[test]
    fn unknown_entry_level_counts_as_info() {
        let entry = LogEntry {
            line: "x".to_string(),
            level: "NOTICE".to_string(),
        };
        assert_eq!(entry.severity(), LogLevel::Info);
        assert_eq!(LogEntry::new("y", LogLevel::Debug).level, "DEBUG");
    }
}
