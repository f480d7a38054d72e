//! RecordingListener - 受け取った通知をすべてメモリに保持する
//!
//! テストダブルとして使う想定（配送順の検証など）。

use std::sync::{Mutex, PoisonError};

use crate::domain::{LogEntry, SdkEvent};
use crate::ports::Listener;

#[derive(Debug, Default)]
pub struct RecordingListener {
    logs: Mutex<Vec<LogEntry>>,
    events: Mutex<Vec<SdkEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Just the `line` of every recorded entry.
    pub fn lines(&self) -> Vec<String> {
        self.logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.line.clone())
            .collect()
    }

    pub fn events(&self) -> Vec<SdkEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Listener for RecordingListener {
    fn on_log(&self, entry: LogEntry) {
        self.logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    fn on_event(&self, event: SdkEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
