//! Optional keep-alive HTTP endpoint.
//!
//! Serves a static banner so uptime monitors can ping the process. Runs as an
//! independent background task and shares no state with the bot.

use crate::config::KeepaliveConfig;

use axum::Router;
use axum::routing::get;
use tokio::sync::watch;

use std::net::SocketAddr;

const BANNER: &str =
    "Musebot is running. Point an uptime monitor at this URL to keep the host awake.";

/// Spawn the keep-alive server as a background tokio task.
///
/// Returns the `JoinHandle` so the caller can hold it for lifetime management.
/// The server shuts down when `shutdown_rx` signals true.
pub async fn start_keepalive_server(
    config: &KeepaliveConfig,
    shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let bind_str = format!("{}:{}", config.bind, config.port);
    let bind: SocketAddr = bind_str
        .parse()
        .map_err(|error| anyhow::anyhow!("invalid keepalive bind address '{bind_str}': {error}"))?;

    let app = Router::new().route("/", get(banner_handler));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|error| anyhow::anyhow!("failed to bind keepalive server to {bind}: {error}"))?;

    tracing::info!(address = %bind, "keepalive server started");

    let handle = tokio::spawn(async move {
        let mut shutdown_rx = shutdown_rx;
        let shutdown_signal = async move {
            let _ = shutdown_rx.wait_for(|shutdown| *shutdown).await;
        };

        if let Err(error) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!(%error, "keepalive server failed");
        }
    });

    Ok(handle)
}

async fn banner_handler() -> &'static str {
    BANNER
}
