// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    InvalidAuthHeader,
    /// Signature, structure or claims failed verification
    InvalidToken,
    /// Token has expired
    TokenExpired,
    /// Token could not be created
    TokenCreation(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    message: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenCreation(_) => "token_creation_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InvalidToken | AuthError::TokenExpired => StatusCode::FORBIDDEN,
            AuthError::TokenCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Access token required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidToken => write!(f, "Invalid or expired token"),
            AuthError::TokenExpired => write!(f, "Invalid or expired token"),
            AuthError::TokenCreation(msg) => write!(f, "Failed to create token: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let AuthError::TokenCreation(msg) = &self {
            tracing::error!(error = %msg, "Token creation failed");
        }
        let message = match &self {
            AuthError::TokenCreation(_) if !cfg!(feature = "dev") => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        let body = Json(AuthErrorBody {
            message,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
