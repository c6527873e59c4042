mod config;
mod error;
mod irc;
mod logging;

use crate::irc::connection::Connection;
use crate::logging::ChatLog;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    let config_path = config::config_path();
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Archive the previous run's log before anything is written
    let log = ChatLog::create(&cfg.output_file)
        .with_context(|| format!("Failed to prepare chat log {}", cfg.output_file.display()))?;
    info!(path = %log.path().display(), "Chat log ready");

    let mut conn = Connection::connect(cfg, Box::new(log)).await?;
    conn.handshake().await.context("Registration failed")?;

    // Receive loop runs on its own task until Ctrl-C or the server hangs up
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut worker = tokio::spawn(async move {
        let outcome = conn.run(shutdown_rx).await;
        (conn, outcome)
    });

    let (mut conn, outcome) = tokio::select! {
        joined = &mut worker => joined?,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    info!("Interrupted, closing connection");
                    let _ = shutdown_tx.send(true);
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
            worker.await?
        }
    };

    if let Err(e) = conn.close().await {
        warn!(error = %e, "Transport shutdown failed");
    }
    info!(state = ?conn.state(), "Connection closed");
    drop(conn);

    wait_for_enter().await;
    outcome?;
    Ok(())
}

/// Keep the console window open until the operator acknowledges.
async fn wait_for_enter() {
    println!("Press Enter to exit.");
    let mut line = String::new();
    let _ = BufReader::new(tokio::io::stdin()).read_line(&mut line).await;
}
