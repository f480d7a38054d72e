use std::sync::Arc;

use crate::domain::{LogEntry, SdkEvent};
use crate::ports::Listener;

/// MultiListener fans every notification out to its children, in order.
pub struct MultiListener {
    listeners: Vec<Arc<dyn Listener>>,
}

impl MultiListener {
    pub fn new(listeners: Vec<Arc<dyn Listener>>) -> Self {
        Self { listeners }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Listener for MultiListener {
    fn on_log(&self, entry: LogEntry) {
        for listener in &self.listeners {
            listener.on_log(entry.clone());
        }
    }

    fn on_event(&self, event: SdkEvent) {
        for listener in &self.listeners {
            listener.on_event(event.clone());
        }
    }
}
