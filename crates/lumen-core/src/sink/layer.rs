//! SinkLayer - tracing のイベントを LogEntry に変換して Sink に流す
//!
//! ランタイム内のどこで `tracing::info!` などが呼ばれても、
//! 登録された Listener の `on_log` に届くようにするためのブリッジ。

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use super::dispatcher::{INTERNAL_TARGET, SinkHandle};
use crate::domain::{LogEntry, LogLevel};

/// SinkLayer は tracing_subscriber の Layer
///
/// # 使用例
/// ```ignore
/// tracing_subscriber::registry()
///     .with(EnvFilter::new("info"))
///     .with(SinkLayer::new(dispatcher.handle()))
///     .init();
/// ```
pub struct SinkLayer {
    sink: SinkHandle,
}

impl SinkLayer {
    pub fn new(sink: SinkHandle) -> Self {
        Self { sink }
    }
}

impl<S: Subscriber> Layer<S> for SinkLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(INTERNAL_TARGET) {
            return;
        }

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let level = LogLevel::from(metadata.level());
        let line = format!("{} - {}", metadata.target(), visitor.finish());
        self.sink.dispatch_log(LogEntry::new(line, level));
    }
}

/// message を先頭に、残りのフィールドを ` key=value` で連結する
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
