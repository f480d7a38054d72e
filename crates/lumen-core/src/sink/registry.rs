//! SinkRegistry - 現在の Listener とフィルタを保持する単一スロット
//!
//! # 学習ポイント
//! - `RwLock<Arc<T>>` による「読み手はクローンして即ロック解放」パターン
//! - 書き込み（登録）は Arc の差し替え 1 回で完結する
//! - Listener 呼び出し中はロックを保持しない

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{LogEntry, LogLevel};
use crate::impls::NoopListener;
use crate::ports::Listener;

/// Binding は登録 1 回分（listener + filter）
///
/// 登録のたびに新しい Binding が作られ、古いものは参照が消えた時点で drop されます。
pub struct Binding {
    listener: Arc<dyn Listener>,
    filter: Option<LogLevel>,
    generation: u64,
}

impl Binding {
    pub fn listener(&self) -> &Arc<dyn Listener> {
        &self.listener
    }

    pub fn filter(&self) -> Option<LogLevel> {
        self.filter
    }

    /// 0 is the initial no-op binding; each registration increments it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `entry` passes this binding's level filter.
    pub fn accepts(&self, entry: &LogEntry) -> bool {
        match self.filter {
            Some(threshold) => threshold.allows(entry.severity()),
            None => true,
        }
    }
}

/// SinkRegistry はプロセス全体ではなくランタイム単位のコンテキスト
///
/// # 使用例
/// ```ignore
/// let registry = SinkRegistry::new();
/// registry.set(Arc::new(MyListener), Some(LogLevel::Warn));
/// let binding = registry.current();
/// ```
///
/// # 並行性
/// - `set` は書き込みロック内で Arc を差し替えるだけ
/// - `current` は読み込みロック内で Arc をクローンするだけ
/// - 半端に更新された listener が見えることはない
pub struct SinkRegistry {
    slot: RwLock<Arc<Binding>>,
    generation: AtomicU64,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Arc::new(Binding {
                listener: Arc::new(NoopListener),
                filter: None,
                generation: 0,
            })),
            generation: AtomicU64::new(0),
        }
    }

    /// Bind `listener`, replacing whatever was bound before (last write wins).
    pub fn set(&self, listener: Arc<dyn Listener>, filter: Option<LogLevel>) -> u64 {
        // slot は常に完全な Arc を指すので poison されていても中身は有効
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // 採番と差し替えは同じロック内（slot の generation は単調増加）
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *slot = Arc::new(Binding {
            listener,
            filter,
            generation,
        });
        generation
    }

    /// Bind a no-op listener. There is no separate "unregistered" state.
    pub fn clear(&self) -> u64 {
        self.set(Arc::new(NoopListener), None)
    }

    pub fn current(&self) -> Arc<Binding> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&slot)
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}
