// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mock market data.
//!
//! Prices are fixed per asset. The 24h changes, market moves and history
//! points are random on every call; nothing here talks to a price feed.

use chrono::{DateTime, TimeDelta, Utc};
use ring::rand::{SecureRandom, SystemRandom};

use crate::identifiers::RandomnessError;
use crate::models::{MarketData, PriceBoard, PriceHistory, PricePoint, PriceQuote, SpotPrice};

/// Circulating supply used for the mock market cap.
const MOCK_SUPPLY: f64 = 19_000_000.0;
/// Units traded per day used for the mock volume.
const MOCK_DAILY_UNITS: f64 = 50_000.0;

/// Largest `days` accepted by [`history`].
pub const MAX_HISTORY_DAYS: u32 = 365;
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

/// A listed asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asset {
    pub symbol: &'static str,
    pub name: &'static str,
    pub usd: f64,
}

pub const BITCOIN: Asset = Asset {
    symbol: "BTC",
    name: "Bitcoin",
    usd: 45_000.0,
};
pub const ETHEREUM: Asset = Asset {
    symbol: "ETH",
    name: "Ethereum",
    usd: 3_200.0,
};
pub const LITECOIN: Asset = Asset {
    symbol: "LTC",
    name: "Litecoin",
    usd: 180.0,
};
pub const BITCOIN_CASH: Asset = Asset {
    symbol: "BCH",
    name: "Bitcoin Cash",
    usd: 520.0,
};

pub const ASSETS: [Asset; 4] = [BITCOIN, ETHEREUM, LITECOIN, BITCOIN_CASH];

/// Look up an asset by symbol, case-insensitively.
pub fn find(symbol: &str) -> Option<Asset> {
    ASSETS
        .into_iter()
        .find(|asset| asset.symbol.eq_ignore_ascii_case(symbol.trim()))
}

/// Uniform sample from `[0, 1)`.
fn unit(rng: &SystemRandom) -> Result<f64, RandomnessError> {
    let mut bytes = [0u8; 8];
    rng.fill(&mut bytes).map_err(|_| RandomnessError)?;
    // 53 random bits fill the f64 mantissa exactly.
    Ok((u64::from_be_bytes(bytes) >> 11) as f64 / (1u64 << 53) as f64)
}

/// Uniform sample from `[low, high)`.
fn uniform(rng: &SystemRandom, low: f64, high: f64) -> Result<f64, RandomnessError> {
    Ok(low + unit(rng)? * (high - low))
}

/// Percent change within [-5, 5].
fn change_24h(rng: &SystemRandom) -> Result<f64, RandomnessError> {
    uniform(rng, -5.0, 5.0)
}

fn spot(rng: &SystemRandom, asset: Asset) -> Result<SpotPrice, RandomnessError> {
    Ok(SpotPrice {
        usd: asset.usd,
        change_24h: change_24h(rng)?,
    })
}

pub fn board(rng: &SystemRandom) -> Result<PriceBoard, RandomnessError> {
    Ok(PriceBoard {
        bitcoin: spot(rng, BITCOIN)?,
        ethereum: spot(rng, ETHEREUM)?,
        litecoin: spot(rng, LITECOIN)?,
        bitcoin_cash: spot(rng, BITCOIN_CASH)?,
    })
}

pub fn quote(rng: &SystemRandom, asset: Asset, now: DateTime<Utc>) -> Result<PriceQuote, RandomnessError> {
    Ok(PriceQuote {
        symbol: asset.symbol.to_string(),
        usd: asset.usd,
        change_24h: change_24h(rng)?,
        last_updated: now,
    })
}

pub fn market(rng: &SystemRandom, asset: Asset, now: DateTime<Utc>) -> Result<MarketData, RandomnessError> {
    Ok(MarketData {
        symbol: asset.symbol.to_string(),
        name: asset.name.to_string(),
        current_price: asset.usd,
        market_cap: asset.usd * MOCK_SUPPLY,
        volume_24h: asset.usd * MOCK_DAILY_UNITS,
        price_change_24h: uniform(rng, -500.0, 500.0)?,
        price_change_percentage_24h: change_24h(rng)?,
        high_24h: asset.usd * 1.05,
        low_24h: asset.usd * 0.95,
        last_updated: now,
    })
}

/// One point per day from `days` ago up to `now`, each within ±5% of the
/// asset price and rounded to cents.
///
/// Callers bound `days` by [`MAX_HISTORY_DAYS`].
pub fn history(
    rng: &SystemRandom,
    asset: Asset,
    days: u32,
    now: DateTime<Utc>,
) -> Result<PriceHistory, RandomnessError> {
    let days = days.min(MAX_HISTORY_DAYS);
    let history = (0..=days)
        .rev()
        .map(|back| -> Result<PricePoint, RandomnessError> {
            let variation = uniform(rng, -0.05, 0.05)?;
            Ok(PricePoint {
                date: now - TimeDelta::days(i64::from(back)),
                price: round_cents(asset.usd * (1.0 + variation)),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PriceHistory {
        symbol: asset.symbol.to_string(),
        days,
        history,
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
