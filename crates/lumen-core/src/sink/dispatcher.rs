//! Dispatcher - producer と Listener の間の bounded channel + dispatch タスク
//!
//! # フロー
//! 1. producer（任意のスレッド）が `SinkHandle::dispatch_*` で try_send
//! 2. dispatch タスク 1 本が受信し、その時点の Binding を取得
//! 3. フィルタを通ったものだけ Listener に渡す（panic は catch_unwind で隔離）
//!
//! # 再登録のタイミング
//! 配送中の 1 件は古い Listener で完了し、次に取り出した通知から新しい Listener に届く。
//! 1 件が 2 つの Listener に届くことも、再登録で消えることもない。

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::registry::SinkRegistry;
use super::stats::{DispatchCounts, DispatchStats};
use crate::domain::{LogEntry, LogLevel, SdkEvent};
use crate::ports::Listener;

pub const DEFAULT_CAPACITY: usize = 1024;

/// dispatch 自身のログはこの target で出す（SinkLayer は転送しない）
pub(crate) const INTERNAL_TARGET: &str = "lumen_core::sink::dispatch";

enum Notification {
    Log(LogEntry),
    Event(SdkEvent),
    Flush(oneshot::Sender<()>),
}

/// Producer-side handle. Cheap to clone; every clone feeds the same task.
#[derive(Clone)]
pub struct SinkHandle {
    tx: mpsc::Sender<Notification>,
    registry: Arc<SinkRegistry>,
    stats: Arc<DispatchStats>,
}

impl SinkHandle {
    /// Register `listener` as the sink, replacing the previous one.
    ///
    /// `filter` を指定すると、それ未満のレベルのログは配送前に捨てられる。
    /// イベントはフィルタの影響を受けない。
    pub fn set_log_stream(&self, listener: Arc<dyn Listener>, filter: Option<LogLevel>) {
        let generation = self.registry.set(listener, filter);
        tracing::debug!(target: INTERNAL_TARGET, generation, ?filter, "log stream registered");
    }

    /// Replace the sink with a no-op listener.
    pub fn clear(&self) {
        let generation = self.registry.clear();
        tracing::debug!(target: INTERNAL_TARGET, generation, "log stream cleared");
    }

    /// Enqueue a log entry. Never blocks; drops and counts when the queue is full.
    ///
    /// フィルタ未満のエントリはキューに入れない（配送時にも再判定する）
    pub fn dispatch_log(&self, entry: LogEntry) {
        if !self.registry.current().accepts(&entry) {
            self.stats.filtered();
            return;
        }
        self.enqueue(Notification::Log(entry));
    }

    /// Enqueue a domain event. Never blocks.
    pub fn dispatch_event(&self, event: SdkEvent) {
        self.enqueue(Notification::Event(event));
    }

    /// Wait until everything enqueued before this call has been handled.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Notification::Flush(done_tx)).await.is_err() {
            return;
        }
        // dispatch タスクが途中で落ちた場合は Err になるが、待つものはもうない
        let _ = done_rx.await;
    }

    pub fn counts(&self) -> DispatchCounts {
        self.stats.snapshot()
    }

    pub fn registry(&self) -> &SinkRegistry {
        &self.registry
    }

    fn enqueue(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.stats.dropped_full(),
            Err(TrySendError::Closed(_)) => self.stats.dropped_closed(),
        }
    }
}

/// Dispatcher owns the dispatch task.
/// - `request_shutdown()` で受付を止める（キューに残った分は配送してから終了）
/// - `shutdown_and_join()` で終了を待てる
pub struct Dispatcher {
    handle: SinkHandle,
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl Dispatcher {
    /// Spawn the dispatch task on the current tokio runtime.
    pub fn spawn(capacity: usize) -> Self {
        Self::spawn_with(Arc::new(SinkRegistry::new()), capacity)
    }

    pub fn spawn_with(registry: Arc<SinkRegistry>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let stats = Arc::new(DispatchStats::default());

        let join = tokio::spawn(dispatch_loop(
            rx,
            Arc::clone(&registry),
            Arc::clone(&stats),
            shutdown_rx,
        ));

        Self {
            handle: SinkHandle {
                tx,
                registry,
                stats,
            },
            shutdown_tx,
            join,
        }
    }

    pub fn handle(&self) -> SinkHandle {
        self.handle.clone()
    }

    pub fn request_shutdown(&self) {
        // ignore send error: the task may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    /// Stop intake, deliver what is already queued, and wait for the task.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        if let Err(e) = self.join.await {
            tracing::error!(target: INTERNAL_TARGET, error = %e, "dispatch task ended abnormally");
        }
    }
}

async fn dispatch_loop(
    mut rx: mpsc::Receiver<Notification>,
    registry: Arc<SinkRegistry>,
    stats: Arc<DispatchStats>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                // sender が drop された場合も終了扱い
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            next = rx.recv() => {
                match next {
                    Some(notification) => deliver(&registry, &stats, notification),
                    None => break,
                }
            }
        }
    }

    // 以降の try_send は Closed になる。バッファに残った分だけ配送する
    rx.close();
    while let Some(notification) = rx.recv().await {
        deliver(&registry, &stats, notification);
    }
    tracing::debug!(target: INTERNAL_TARGET, "dispatch task stopped");
}

fn deliver(registry: &SinkRegistry, stats: &DispatchStats, notification: Notification) {
    match notification {
        Notification::Log(entry) => {
            let binding = registry.current();
            if !binding.accepts(&entry) {
                stats.filtered();
                return;
            }
            let listener = binding.listener();
            match panic::catch_unwind(AssertUnwindSafe(|| listener.on_log(entry))) {
                Ok(()) => stats.delivered_log(),
                Err(payload) => {
                    stats.listener_panic();
                    tracing::warn!(
                        target: INTERNAL_TARGET,
                        generation = binding.generation(),
                        panic = panic_message(&*payload),
                        "listener panicked in on_log"
                    );
                }
            }
        }
        Notification::Event(event) => {
            let binding = registry.current();
            let name = event.name();
            let listener = binding.listener();
            match panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
                Ok(()) => stats.delivered_event(),
                Err(payload) => {
                    stats.listener_panic();
                    tracing::warn!(
                        target: INTERNAL_TARGET,
                        generation = binding.generation(),
                        event = name,
                        panic = panic_message(&*payload),
                        "listener panicked in on_event"
                    );
                }
            }
        }
        Notification::Flush(done) => {
            let _ = done.send(());
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
