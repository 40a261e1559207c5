// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Development-only token minting.
//!
//! Compiled only with the `dev` feature. Lets local clients obtain a bearer
//! token without a separate identity service.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{issue_token, token::DEFAULT_TOKEN_TTL},
    error::ApiError,
    state::AppState,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevTokenRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevTokenResponse {
    pub token: String,
}

/// Mint a 24 h token for `userId`.
pub async fn issue_dev_token(
    State(state): State<AppState>,
    body: Result<Json<DevTokenRequest>, JsonRejection>,
) -> Result<Json<DevTokenResponse>, ApiError> {
    let Json(request) = body?;
    let user_id = request
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("userId is required"))?;

    let token = issue_token(&state.auth, user_id, request.email.as_deref(), DEFAULT_TOKEN_TTL)?;
    tracing::warn!(user_id = %user_id, "Issued development token");

    Ok(Json(DevTokenResponse { token }))
}
