use crate::domain::{LogEntry, SdkEvent};
use crate::ports::Listener;

/// Discards everything. Bound by default and by `SinkHandle::clear`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl Listener for NoopListener {
    fn on_log(&self, _entry: LogEntry) {}

    fn on_event(&self, _event: SdkEvent) {}
}
