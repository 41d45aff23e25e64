//! `hiradio` CLI - list, inspect and play Hichannel radio stations

mod cmd;
mod logging;
mod player;
mod table;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, Level};

use hiradio::client::{DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS};
use hiradio::HiRadioClient;

#[derive(Parser)]
#[command(name = "hiradio")]
#[command(about = "Play Hichannel radio stations with your own player")]
#[command(version)]
struct Cli {
    /// Catalog API base URL
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides it
    #[arg(long, global = true, default_value = "warn")]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List radio stations with their current program and rank
    List,

    /// Display a station's details and program list
    Info {
        /// Channel id (defaults to the last one shown)
        channel_id: Option<u32>,
    },

    /// Play a station through the local stream proxy
    Play(cmd::play::PlayArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = HiRadioClient::builder()
        .endpoint(cli.endpoint)
        .timeout(Duration::from_secs(cli.timeout))
        .build()
        .context("Failed to create the catalog client")?;

    match cli.command {
        Commands::List => cmd::list::run(&client).await,
        Commands::Info { channel_id } => cmd::info::run(&client, channel_id).await,
        Commands::Play(args) => cmd::play::run(client, args).await,
    }
}
