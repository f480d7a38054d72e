//! Listener port - ログ／イベントの受け口
//!
//! ホストアプリケーションが実装し、`SinkHandle::set_log_stream` で登録します。

use crate::domain::{LogEntry, SdkEvent};

/// Listener はランタイムからの通知を受け取る
///
/// # 呼び出し元
/// - 常に dispatch タスク 1 本から順番に呼ばれる（同時に 2 回呼ばれることはない）
/// - `on_log` はフィルタ通過後のみ、`on_event` は無条件
///
/// # 実装上の注意
/// - 重い処理はキューに渡して別タスクで行う（`ChannelListener` 参照）
/// - panic しても dispatch タスクは止まらないが、その通知は失われる
pub trait Listener: Send + Sync {
    fn on_log(&self, entry: LogEntry);

    fn on_event(&self, event: SdkEvent);
}
