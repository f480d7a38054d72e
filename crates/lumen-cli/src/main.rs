mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lumen_core::impls::InMemoryNodeApi;
use lumen_core::{
    ConnectRequest, DEFAULT_CAPACITY, Dispatcher, EnvironmentType, LogLevel, NodeApi, SdkServices,
    SinkHandle, mnemonic_to_seed,
};
use serde::Serialize;

use crate::config::{CliConfig, Overrides};

#[derive(Debug, Parser)]
#[command(name = "lumen", version, about = "Drive the node SDK and stream its logs and events")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, env = "LUMEN_ENV")]
    env: Option<EnvironmentType>,

    #[arg(long, global = true, env = "LUMEN_API_KEY")]
    api_key: Option<String>,

    #[arg(long, global = true)]
    invite_code: Option<String>,

    /// Minimum level delivered to the log stream
    #[arg(long, global = true, env = "LUMEN_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    /// Also append the log stream to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the hex seed derived from a mnemonic
    Seed {
        #[arg(long, env = "LUMEN_MNEMONIC")]
        mnemonic: String,
    },
    /// Recover node credentials for a mnemonic
    Recover {
        #[arg(long, env = "LUMEN_MNEMONIC")]
        mnemonic: String,
    },
    /// Recover (or register) the node, connect, and print node info
    NodeInfo {
        #[arg(long, env = "LUMEN_MNEMONIC")]
        mnemonic: String,

        /// Pull fresh state before printing
        #[arg(long)]
        sync: bool,
    },
}

#[derive(Serialize)]
struct CredentialsView {
    device_key_len: usize,
    device_cert_len: usize,
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

async fn run(command: Command, config: &CliConfig, sink: &SinkHandle) -> anyhow::Result<()> {
    // 本物のバックエンドは別クレート。CLI は開発用の in-memory 実装で動く
    let api: Arc<dyn NodeApi> = Arc::new(InMemoryNodeApi::new());
    let sdk_config = config.to_sdk_config();

    match command {
        Command::Seed { mnemonic } => {
            let seed = mnemonic_to_seed(&mnemonic)?;
            println!("{}", hex(&seed));
        }
        Command::Recover { mnemonic } => {
            let seed = mnemonic_to_seed(&mnemonic)?;
            let creds = SdkServices::recover_node(api.as_ref(), sdk_config.network, &seed).await?;
            let view = CredentialsView {
                device_key_len: creds.device_key.len(),
                device_cert_len: creds.device_cert.len(),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::NodeInfo { mnemonic, sync } => {
            let seed = mnemonic_to_seed(&mnemonic)?;
            let credentials =
                match SdkServices::recover_node(api.as_ref(), sdk_config.network, &seed).await {
                    Ok(creds) => Some(creds),
                    Err(e) => {
                        tracing::info!(error = %e, "no node to recover, registering a new one");
                        None
                    }
                };
            let request = ConnectRequest {
                config: sdk_config,
                seed,
                credentials,
            };
            let services = SdkServices::connect(request, api, sink.clone()).await?;
            let state = if sync {
                services.sync().await?
            } else {
                services.node_info()?
            };
            println!("{}", serde_json::to_string_pretty(&state)?);
            services.disconnect().await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    config.apply(Overrides {
        env: cli.env,
        api_key: cli.api_key,
        invite_code: cli.invite_code,
        log_level: cli.log_level,
        log_file: cli.log_file,
    });

    let dispatcher = Dispatcher::spawn(config.queue_capacity.unwrap_or(DEFAULT_CAPACITY));
    let sink = dispatcher.handle();
    logging::init_tracing(&sink)?;
    let listener = logging::build_listener(&config).context("failed to set up log stream")?;
    sink.set_log_stream(listener, Some(config.log_level()));

    let result = run(cli.command, &config, &sink).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
    }

    // 残った通知を出し切ってから終了
    dispatcher.shutdown_and_join().await;
    result
}
