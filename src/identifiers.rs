// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mock chain identifiers.
//!
//! Transaction hashes and wallet addresses are random bytes formatted to
//! look like their real-world counterparts. Nothing here is derived from
//! keys and nothing can be verified on any chain.

use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

use crate::storage::Currency;

/// Random bytes behind a transaction hash.
const TX_HASH_BYTES: usize = 32;

/// Random bytes behind an address (40 hex characters).
const ADDRESS_BYTES: usize = 20;

/// Hex characters kept for non-EVM addresses.
const SHORT_ADDRESS_HEX_LEN: usize = 33;

/// The system RNG refused to produce bytes.
#[derive(Debug, Error)]
#[error("system random number generator unavailable")]
pub struct RandomnessError;

fn random_hex(rng: &SystemRandom, len: usize) -> Result<String, RandomnessError> {
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes).map_err(|_| RandomnessError)?;
    Ok(hex::encode(bytes))
}

/// Generate a transaction hash: `0x` followed by 64 hex characters.
pub fn transaction_hash(rng: &SystemRandom) -> Result<String, RandomnessError> {
    Ok(format!("0x{}", random_hex(rng, TX_HASH_BYTES)?))
}

/// Address prefix per currency.
pub fn address_prefix(currency: Currency) -> &'static str {
    match currency {
        Currency::Eth => "0x",
        Currency::Ltc => "L",
        Currency::Bch => "bitcoincash:",
        Currency::Btc | Currency::Ada | Currency::Dot => "1",
    }
}

/// Generate a mock address for `currency`.
///
/// ETH addresses carry the full 40 hex characters; every other currency is
/// truncated to 33.
pub fn wallet_address(rng: &SystemRandom, currency: Currency) -> Result<String, RandomnessError> {
    let mut body = random_hex(rng, ADDRESS_BYTES)?;
    if currency != Currency::Eth {
        body.truncate(SHORT_ADDRESS_HEX_LEN);
    }
    Ok(format!("{}{}", address_prefix(currency), body))
}
