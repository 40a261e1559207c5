// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// "development" for `dev` builds, "production" otherwise.
    pub environment: String,
    /// Seconds since the server state was created.
    pub uptime_secs: u64,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Confirmation scheduler state ("ok" or "stopped").
    pub scheduler: String,
    /// Transactions waiting for their scheduled confirmation.
    pub pending_confirmations: usize,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

fn environment() -> &'static str {
    if cfg!(feature = "dev") {
        "development"
    } else {
        "production"
    }
}

/// Health check endpoint handler.
///
/// Returns 200 while the confirmation scheduler accepts work, 503 once it
/// has been shut down.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is shutting down", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let scheduler = state.ledger.scheduler();
    let scheduler_ok = !scheduler.is_shut_down();

    let response = ReadyResponse {
        status: if scheduler_ok { "ok" } else { "degraded" }.to_string(),
        environment: environment().to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        checks: HealthChecks {
            service: "ok".to_string(),
            scheduler: if scheduler_ok { "ok" } else { "stopped" }.to_string(),
            pending_confirmations: scheduler.pending(),
        },
    };

    let status = if scheduler_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
/// Does not check dependencies - use readiness for that.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Returns 200 only while the service accepts new transactions.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}
