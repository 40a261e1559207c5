// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied to the protected router subtree with
//! `axum::middleware::from_fn_with_state`. On success the verified
//! [`AuthenticatedUser`] is inserted into the request extensions, where the
//! [`Auth`](super::Auth) extractor picks it up.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{verify_token, AuthConfig, AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Pull the bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }
    Ok(token)
}

/// Resolve the caller from request headers.
pub fn authenticate(headers: &HeaderMap, config: &AuthConfig) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    verify_token(config, token)
}

/// Authentication middleware function.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<AuthenticatedUser>().is_some() {
        return next.run(request).await;
    }

    match authenticate(request.headers(), &state.auth) {
        Ok(user) => {
            tracing::debug!(user_id = %user.user_id, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error_code = e.error_code(), "Authentication rejected");
            e.into_response()
        }
    }
}
