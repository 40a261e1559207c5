// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mock market data endpoints. Public, no authentication.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::Utc;

use crate::{
    error::ApiError,
    models::{HistoryQuery, MarketData, PriceBoard, PriceHistory, PriceQuote},
    prices::{self, Asset, DEFAULT_HISTORY_DAYS, MAX_HISTORY_DAYS},
    state::AppState,
};

fn listed(symbol: &str) -> Result<Asset, ApiError> {
    prices::find(symbol).ok_or_else(|| ApiError::not_found("Cryptocurrency not found"))
}

fn randomness_failed(e: impl std::fmt::Display) -> ApiError {
    ApiError::internal(&format!("Price simulation failed: {e}"))
}

/// Spot prices of every listed asset.
#[utoipa::path(
    get,
    path = "/api/crypto/prices",
    tag = "Crypto",
    responses(
        (status = 200, description = "Spot prices keyed by asset slug", body = PriceBoard)
    )
)]
pub async fn prices(State(state): State<AppState>) -> Result<Json<PriceBoard>, ApiError> {
    prices::board(&state.rng).map(Json).map_err(randomness_failed)
}

/// Spot price of one asset.
#[utoipa::path(
    get,
    path = "/api/crypto/price/{symbol}",
    tag = "Crypto",
    params(
        ("symbol" = String, Path, description = "Asset symbol, e.g. BTC (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Spot price", body = PriceQuote),
        (status = 404, description = "Cryptocurrency not found")
    )
)]
pub async fn price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<PriceQuote>, ApiError> {
    let asset = listed(&symbol)?;
    prices::quote(&state.rng, asset, Utc::now())
        .map(Json)
        .map_err(randomness_failed)
}

/// Market overview of one asset.
#[utoipa::path(
    get,
    path = "/api/crypto/market/{symbol}",
    tag = "Crypto",
    params(
        ("symbol" = String, Path, description = "Asset symbol, e.g. BTC (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Market data", body = MarketData),
        (status = 404, description = "Cryptocurrency not found")
    )
)]
pub async fn market(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<MarketData>, ApiError> {
    let asset = listed(&symbol)?;
    prices::market(&state.rng, asset, Utc::now())
        .map(Json)
        .map_err(randomness_failed)
}

/// Daily price history of one asset.
#[utoipa::path(
    get,
    path = "/api/crypto/history/{symbol}",
    tag = "Crypto",
    params(
        ("symbol" = String, Path, description = "Asset symbol, e.g. BTC (case-insensitive)"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Price history, oldest first", body = PriceHistory),
        (status = 400, description = "Invalid days"),
        (status = 404, description = "Cryptocurrency not found")
    )
)]
pub async fn history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<PriceHistory>, ApiError> {
    let asset = listed(&symbol)?;
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    if days > MAX_HISTORY_DAYS {
        return Err(ApiError::bad_request(format!(
            "days cannot exceed {MAX_HISTORY_DAYS}"
        )));
    }

    prices::history(&state.rng, asset, days, Utc::now())
        .map(Json)
        .map_err(randomness_failed)
}
