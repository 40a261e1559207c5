// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing (PBKDF2-HMAC-SHA256).
//!
//! Hashes are stored as `pbkdf2-sha256$<iterations>$<salt hex>$<hash hex>`.
//! Both operations are CPU bound; async callers run them on the blocking
//! pool.

use std::num::NonZeroU32;

use ring::{
    digest, pbkdf2,
    rand::{SecureRandom, SystemRandom},
};
use thiserror::Error;

const ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = digest::SHA256_OUTPUT_LEN;

pub const PBKDF2_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(iterations) => iterations,
    None => panic!("PBKDF2 iteration count must be non-zero"),
};

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("system random number generator unavailable")]
    Randomness,
}

/// Hash `password` with a fresh random salt.
pub fn hash_password(rng: &SystemRandom, password: &str) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt).map_err(|_| PasswordError::Randomness)?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(ALGORITHM, PBKDF2_ITERATIONS, &salt, password.as_bytes(), &mut hash);

    Ok(format!(
        "{SCHEME}${}${}${}",
        PBKDF2_ITERATIONS,
        hex::encode(salt),
        hex::encode(hash)
    ))
}

/// Check `password` against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(SCHEME), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    let Some(iterations) = iterations.parse().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (hex::decode(salt), hex::decode(hash)) else {
        return false;
    };

    pbkdf2::verify(ALGORITHM, iterations, &salt, password.as_bytes(), &hash).is_ok()
}
