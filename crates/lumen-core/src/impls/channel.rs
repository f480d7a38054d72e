//! ChannelListener - 通知を unbounded channel に渡すだけの Listener
//!
//! dispatch タスク上では push するだけで、重い処理は受信側のタスクで行う。

use tokio::sync::mpsc;

use crate::domain::{LogEntry, SdkEvent};
use crate::ports::Listener;

/// One notification as seen by the receiving side.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkMessage {
    Log(LogEntry),
    Event(SdkEvent),
}

pub struct ChannelListener {
    tx: mpsc::UnboundedSender<SinkMessage>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Listener for ChannelListener {
    fn on_log(&self, entry: LogEntry) {
        // 受信側が drop 済みなら捨てる
        let _ = self.tx.send(SinkMessage::Log(entry));
    }

    fn on_event(&self, event: SdkEvent) {
        let _ = self.tx.send(SinkMessage::Event(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogLevel;
    use crate::sink::{DEFAULT_CAPACITY, Dispatcher};
    use std::sync::Arc;

    #[tokio::test]
    async fn hands_off_in_order() {
        let dispatcher = Dispatcher::spawn(DEFAULT_CAPACITY);
        let sink = dispatcher.handle();
        let (listener, mut rx) = ChannelListener::new();
        sink.set_log_stream(Arc::new(listener), None);

        sink.dispatch_log(LogEntry::new("a", LogLevel::Info));
        sink.dispatch_event(SdkEvent::Synced);
        sink.flush().await;

        assert_eq!(
            rx.recv().await,
            Some(SinkMessage::Log(LogEntry::new("a", LogLevel::Info)))
        );
        assert_eq!(rx.recv().await, Some(SinkMessage::Event(SdkEvent::Synced)));
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (listener, rx) = ChannelListener::new();
        drop(rx);
        listener.on_event(SdkEvent::BackupSucceeded);
    }
}
