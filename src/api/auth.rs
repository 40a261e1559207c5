// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account registration, login and profile endpoints.
//!
//! Registration and login are public and return a 24h bearer token whose
//! `userId` is the account id. Emails are matched case-insensitively.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    auth::{hash_password, issue_token, token::DEFAULT_TOKEN_TTL, verify_password, Auth},
    error::ApiError,
    models::{AuthResponse, LoginRequest, RegisterRequest},
    state::AppState,
    storage::{StorageError, UserRecord},
};

const USER_EXISTS: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Password fields are taken verbatim; only emptiness is rejected.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn token_response(
    state: &AppState,
    message: &str,
    user: UserRecord,
) -> Result<AuthResponse, ApiError> {
    let token = issue_token(&state.auth, &user.id, Some(&user.email), DEFAULT_TOKEN_TTL)?;
    Ok(AuthResponse {
        message: message.to_string(),
        token,
        user,
    })
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Missing fields or email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = body?;
    let (Some(name), Some(email), Some(password)) = (
        non_blank(request.name.as_deref()),
        non_blank(request.email.as_deref()),
        non_empty(request.password.as_deref()),
    ) else {
        return Err(ApiError::bad_request("All fields are required"));
    };

    let email = normalize_email(email);
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request(USER_EXISTS));
    }

    let rng = state.rng.clone();
    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&rng, &password))
        .await
        .map_err(|e| ApiError::internal(&format!("Password hashing task failed: {e}")))?
        .map_err(|e| ApiError::internal(&format!("Password hashing failed: {e}")))?;

    let user = UserRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        email,
        password_hash,
        created_at: Utc::now(),
    };

    match state.users.insert(user.clone()).await {
        Ok(()) => {}
        // Lost a race with a concurrent registration of the same email.
        Err(StorageError::AlreadyExists(_)) => return Err(ApiError::bad_request(USER_EXISTS)),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %user.id, "User registered");

    let response = token_response(&state, "User created successfully", user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email and password.
///
/// Unknown emails and wrong passwords get the same response.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing fields or invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = body?;
    let (Some(email), Some(password)) = (
        non_blank(request.email.as_deref()),
        non_empty(request.password.as_deref()),
    ) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    let Some(user) = state.users.find_by_email(&normalize_email(email)).await? else {
        tracing::debug!("Login rejected: unknown email");
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    };

    let password = password.to_string();
    let stored = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| ApiError::internal(&format!("Password check task failed: {e}")))?;
    if !valid {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(token_response(&state, "Login successful", user)?))
}

/// Profile of the caller.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn me(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserRecord>, ApiError> {
    state
        .users
        .get(&user.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}
