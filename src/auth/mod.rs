// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for the wallet API.
//!
//! ## Auth Flow
//!
//! 1. The client registers or logs in (`/api/auth/register`, `/api/auth/login`)
//!    and receives a 24h HS256 JWT signed with the shared `JWT_SECRET`,
//!    carrying `{userId, email}`
//! 2. The client sends `Authorization: Bearer <jwt>`
//! 3. [`middleware::require_auth`] verifies signature and expiry, then
//!    attaches an [`AuthenticatedUser`] to the request extensions
//! 4. Handlers read it through the [`Auth`] extractor
//!
//! ## Status Codes
//!
//! - Missing or malformed `Authorization` header → 401
//! - Invalid or expired token → 403

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use password::{hash_password, verify_password, PasswordError};
pub use token::{issue_token, verify_token, AuthConfig};
