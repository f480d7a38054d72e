use std::sync::Arc;

use anyhow::Context;
use lumen_core::impls::{ConsoleListener, FileListener, MultiListener};
use lumen_core::{Listener, SinkHandle, SinkLayer};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::config::CliConfig;

const DEFAULT_DIRECTIVES: &str = "warn";

/// tracing の初期化
///
/// - fmt layer: stderr へ、`RUST_LOG`（なければ warn）でフィルタ
/// - SinkLayer: すべてのイベントを log stream へ（レベル判定は Sink 側）
pub fn init_tracing(sink: &SinkHandle) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVES))
        .context("failed to build log filter")?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact()
                .with_filter(env_filter),
        )
        .with(SinkLayer::new(sink.clone()))
        .try_init()
        .context("failed to set global tracing subscriber")?;
    Ok(())
}

/// stdout（+ 指定があればファイル）に書く Listener を組み立てる
pub fn build_listener(config: &CliConfig) -> anyhow::Result<Arc<dyn Listener>> {
    let level = config.log_level();
    let console: Arc<dyn Listener> = Arc::new(ConsoleListener::new(level));
    let Some(path) = &config.log_file else {
        return Ok(console);
    };

    let file = FileListener::new(path, level)
        .with_context(|| format!("can't open log file {}", path.display()))?;
    Ok(Arc::new(MultiListener::new(vec![console, Arc::new(file)])))
}
