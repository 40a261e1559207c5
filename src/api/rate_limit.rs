// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-client rate limiting for the `/api` tree.
//!
//! Each client gets `max_requests` per window, refilled evenly across the
//! window (GCRA). Clients are keyed by the last `X-Forwarded-For` hop when a
//! proxy sets one, otherwise by the peer address.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{config::RateLimitSettings, state::AppState};

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests from this IP, please try again later.";

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Keyed request budget shared by every `/api` request.
pub struct ApiRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl ApiRateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        let burst = NonZeroU32::new(settings.max_requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(settings.window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        }
    }

    /// Spend one request for `key`. On refusal, returns how long until the
    /// next request would be allowed.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.limiter
            .check_key(&key.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Forget clients whose budget is full again.
    pub fn prune(&self) {
        self.limiter.retain_recent();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Prune `limiter` every `period` until `shutdown` is cancelled.
pub async fn prune_periodically(
    limiter: std::sync::Arc<ApiRateLimiter>,
    period: Duration,
    shutdown: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {
                limiter.prune();
                tracing::debug!(clients = limiter.tracked_clients(), "Pruned rate limiter");
            }
        }
    }
}

/// The client a request is charged to.
fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.rsplit(',').map(str::trim).find(|hop| !hop.is_empty()));

    match (forwarded, peer) {
        (Some(hop), _) => hop.to_string(),
        (None, Some(peer)) => peer.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitedBody {
    message: &'static str,
    /// Seconds until the next request is allowed.
    retry_after: u64,
}

fn too_many_requests(wait: Duration) -> Response {
    let retry_after = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    let body = Json(RateLimitedBody {
        message: RATE_LIMITED_MESSAGE,
        retry_after,
    });
    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
    response
        .headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

/// Rate limiting middleware function.
pub async fn limit_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(request.headers(), peer);

    match state.rate_limiter.check(&key) {
        Ok(()) => next.run(request).await,
        Err(wait) => {
            tracing::warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
            too_many_requests(wait)
        }
    }
}
