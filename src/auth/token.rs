// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token signing and verification.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{AuthError, AuthenticatedUser, TokenClaims};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Lifetime of tokens minted by [`issue_token`] callers by default.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Shared-secret key material.
#[derive(Clone)]
pub struct AuthConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthConfig {
    /// Build keys from the shared secret.
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

/// Sign a token for `user_id` valid for `ttl`.
pub fn issue_token(
    config: &AuthConfig,
    user_id: &str,
    email: Option<&str>,
    ttl: Duration,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let ttl = i64::try_from(ttl.as_secs()).map_err(|e| AuthError::TokenCreation(e.to_string()))?;
    let claims = TokenClaims {
        user_id: user_id.to_string(),
        email: email.map(str::to_string),
        iat: now,
        exp: now.saturating_add(ttl),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &config.encoding_key)
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
}

/// Verify signature and expiry, returning the caller.
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<AuthenticatedUser, AuthError> {
    let token_data = decode::<TokenClaims>(token, &config.decoding_key, &config.validation)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

    Ok(AuthenticatedUser::from_claims(token_data.claims))
}
