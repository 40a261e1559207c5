// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::ledger::LedgerError;
use crate::storage::StorageError;

/// Message returned for 500 responses outside `dev` builds.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Unexpected failure. The detail is logged, and only echoed to the
    /// client in `dev` builds.
    pub fn internal(detail: &str) -> Self {
        tracing::error!(error = %detail, "Internal server error");
        let message = if cfg!(feature = "dev") {
            detail.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(message) => Self::bad_request(message),
            LedgerError::NotFound(_) => Self::not_found(err.to_string()),
            LedgerError::Storage(e) => e.into(),
            LedgerError::Randomness(e) => Self::internal(&e.to_string()),
            LedgerError::Schedule(e) => Self::internal(&e.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::internal(&err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if let AuthError::TokenCreation(detail) = &err {
            return Self::internal(detail);
        }
        Self::new(err.status_code(), err.to_string())
    }
}

/// Malformed or non-JSON bodies are client errors.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
