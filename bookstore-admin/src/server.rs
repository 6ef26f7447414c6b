//! HTTP server for the admin console.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::admin::{AdminState, admin_router};

/// Serve the console on `listen_addr` until Ctrl-C.
pub async fn run_server(listen_addr: SocketAddr, state: Arc<AdminState>) -> Result<()> {
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {listen_addr}"))?;

    info!(addr = %listen_addr, "Starting admin console");

    axum::serve(listener, admin_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Admin console server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down admin console");
}
