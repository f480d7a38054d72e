use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by producers and the dispatch task.
#[derive(Debug, Default)]
pub(crate) struct DispatchStats {
    delivered_logs: AtomicU64,
    delivered_events: AtomicU64,
    filtered: AtomicU64,
    dropped_full: AtomicU64,
    dropped_closed: AtomicU64,
    listener_panics: AtomicU64,
}

impl DispatchStats {
    pub(crate) fn delivered_log(&self) {
        self.delivered_logs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn delivered_event(&self) {
        self.delivered_events.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn dropped_full(&self) {
        self.dropped_full.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn dropped_closed(&self) {
        self.dropped_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn listener_panic(&self) {
        self.listener_panics.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> DispatchCounts {
        DispatchCounts {
            delivered_logs: self.delivered_logs.load(Ordering::Relaxed),
            delivered_events: self.delivered_events.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            dropped_full: self.dropped_full.load(Ordering::Relaxed),
            dropped_closed: self.dropped_closed.load(Ordering::Relaxed),
            listener_panics: self.listener_panics.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the dispatch counters.
///
/// `listener_panics` の通知は delivered に数えない。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchCounts {
    pub delivered_logs: u64,
    pub delivered_events: u64,
    pub filtered: u64,
    pub dropped_full: u64,
    pub dropped_closed: u64,
    pub listener_panics: u64,
}
