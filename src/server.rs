// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP(S) serving and graceful shutdown.

use std::net::SocketAddr;
use std::time::Duration;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{api::router, config::TlsPaths, state::AppState};

/// Time given to in-flight requests once shutdown starts.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Serve the API on `addr` until `handle` is shut down.
///
/// Plain HTTP unless `tls` is set. Connection info is attached to requests
/// so the rate limiter can key on the peer address.
pub async fn serve(
    addr: SocketAddr,
    tls: Option<&TlsPaths>,
    state: AppState,
    handle: Handle<SocketAddr>,
) -> std::io::Result<()> {
    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();

    match tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
            info!(%addr, "Wallet ledger server listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app)
                .await
        }
        None => {
            info!(%addr, "Wallet ledger server listening on http (docs at /docs)");
            axum_server::bind(addr).handle(handle).serve(app).await
        }
    }
}

/// Drain connections once `shutdown` is cancelled.
pub async fn drain_on_shutdown(handle: Handle<SocketAddr>, shutdown: CancellationToken) {
    shutdown.cancelled().await;
    info!("Draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
}
