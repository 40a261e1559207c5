// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;
use std::sync::Arc;

use axum_server::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use wallet_ledger_server::{
    api::rate_limit::prune_periodically,
    config::Config,
    server::{drain_on_shutdown, serve},
    state::AppState,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install rustls crypto provider")?;

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    if config.jwt_secret_is_default {
        warn!("JWT_SECRET is not set, tokens are signed with the public default secret");
    }

    let addr = config.bind_addr()?;
    let state = AppState::from_config(&config);
    let ledger = Arc::clone(&state.ledger);

    let handle: Handle<SocketAddr> = Handle::new();
    tokio::spawn(cancel_on_signal(state.shutdown.clone()));
    tokio::spawn(drain_on_shutdown(handle.clone(), state.shutdown.clone()));
    tokio::spawn(prune_periodically(
        Arc::clone(&state.rate_limiter),
        config.rate_limit.window,
        state.shutdown.clone(),
    ));

    serve(addr, config.tls.as_ref(), state, handle).await?;

    ledger.shutdown();
    info!("Server stopped");
    Ok(())
}

/// Cancel `shutdown` on SIGINT or SIGTERM.
async fn cancel_on_signal(shutdown: CancellationToken) {
    wait_for_signal().await;
    info!("Shutdown signal received");
    shutdown.cancel();
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
