//! FileListener - ファイルに追記する Listener

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use super::console::{format_event, format_log};
use crate::domain::{LogEntry, LogLevel, SdkEvent};
use crate::ports::Listener;
use crate::sink::dispatcher::INTERNAL_TARGET;

/// FileListener は 1 通知 1 行でファイルへ追記
///
/// LineWriter なので改行ごとに flush される。
pub struct FileListener {
    file: Mutex<LineWriter<File>>,
    level: LogLevel,
}

impl FileListener {
    pub fn new(path: impl AsRef<Path>, level: LogLevel) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(LineWriter::new(file)),
            level,
        })
    }

    fn write_line(&self, line: &str) {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(file, "{line}") {
            tracing::warn!(target: INTERNAL_TARGET, error = %e, "file listener write failed");
        }
    }
}

impl Listener for FileListener {
    fn on_log(&self, entry: LogEntry) {
        if self.level.allows(entry.severity()) {
            self.write_line(&format_log(&entry));
        }
    }

    fn on_event(&self, event: SdkEvent) {
        self.write_line(&format_event(&event));
    }
}
