use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;
use hiradio::{stream_url, HiRadioClient, StreamProxy};
use tokio::sync::oneshot;
use tracing::info;

use super::{load_settings, resolve_channel_id, save_settings};
use crate::player::Player;

const SETTINGS_FILE: &str = "play.json";

#[derive(Args)]
pub struct PlayArgs {
    /// The player which supports HTTP Live Streaming
    #[arg(long)]
    player: Option<String>,

    /// Port for the proxy server
    #[arg(long)]
    port: Option<u16>,

    /// Print output from the player
    #[arg(long)]
    verbose: bool,

    /// Channel id (defaults to the last one played)
    channel_id: Option<u32>,
}

/// `hiradio play [OPTIONS] [CHANNEL_ID]`
pub async fn run(client: HiRadioClient, args: PlayArgs) -> Result<()> {
    let settings = load_settings(SETTINGS_FILE);
    let player = args
        .player
        .or_else(|| settings.player())
        .unwrap_or_default();
    let port = args.port.unwrap_or_else(|| settings.proxy_port());
    let channel_id = resolve_channel_id(args.channel_id, &settings, "play")?;

    settings.set_player(player.as_str());
    settings.set_proxy_port(port);
    settings.set_channel_id(channel_id);
    save_settings(&settings);

    let proxy = StreamProxy::bind(SocketAddr::from(([0, 0, 0, 0], port)))
        .await
        .with_context(|| format!("Failed to start proxy on port {port}"))?;

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(proxy.serve(client, async move {
        let _ = stop_rx.await;
    }));

    let url = stream_url(port, channel_id);
    let player = if player.is_empty() {
        println!("Open URL with player: {url}");
        None
    } else {
        Some(Player::new(player, url, args.verbose))
    };
    println!("Press ctrl-c to exit");

    let outcome = tokio::select! {
        result = wait_for_exit(player) => result,
        // The proxy only stops on its own when serving fails
        served = &mut server => {
            served.context("Proxy task failed")?.context("Proxy stopped")?;
            return Ok(());
        }
    };
    println!();

    let _ = stop_tx.send(());
    server
        .await
        .context("Proxy task failed")?
        .context("Proxy stopped")?;
    info!("Stopped playing channel {channel_id}");
    outcome
}

/// Wait for ctrl-c, or for the player to exit if there is one
async fn wait_for_exit(player: Option<Player>) -> Result<()> {
    let interrupted = async {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for ctrl-c")
    };

    match player {
        None => interrupted.await,
        Some(player) => tokio::select! {
            result = player.run() => result,
            result = interrupted => result,
        },
    }
}
