//! ConsoleListener - 標準出力へ書き出す Listener

use std::io::{self, Write};

use chrono::Local;

use crate::domain::{LogEntry, LogLevel, SdkEvent};
use crate::ports::Listener;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `[LEVEL] 2024-01-01 12:00:00: module::path - message`
///
/// モジュールパスは SinkLayer が line の先頭に付ける
pub(crate) fn format_log(entry: &LogEntry) -> String {
    format!(
        "[{}] {}: {}",
        entry.level,
        Local::now().format(TIMESTAMP_FORMAT),
        entry.line
    )
}

/// `[EVENT] 2024-01-01 12:00:00: {"type":"synced"}`
pub(crate) fn format_event(event: &SdkEvent) -> String {
    let body = serde_json::to_string(event).unwrap_or_else(|_| format!("{event:?}"));
    format!("[EVENT] {}: {}", Local::now().format(TIMESTAMP_FORMAT), body)
}

/// ConsoleListener は stdout に 1 行ずつ書く
///
/// 登録時のフィルタとは別に、自前の最小レベルを持つ。
#[derive(Debug, Clone, Copy)]
pub struct ConsoleListener {
    level: LogLevel,
}

impl ConsoleListener {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }
}

impl Listener for ConsoleListener {
    fn on_log(&self, entry: LogEntry) {
        if !self.level.allows(entry.severity()) {
            return;
        }
        let stdout = io::stdout();
        let mut out = stdout.lock();
        // stdout が閉じていても dispatch は続ける
        let _ = writeln!(out, "{}", format_log(&entry));
    }

    fn on_event(&self, event: SdkEvent) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let _ = writeln!(out, "{}", format_event(&event));
    }
}
