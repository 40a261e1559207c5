// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fee estimation.
//!
//! `fee = base_fee * multiplier(priority)`. No state is read or written.

use crate::models::FeeEstimate;

/// Confirmation window reported when the priority is missing or unknown.
const DEFAULT_ESTIMATED_TIME: &str = "10-30 minutes";

/// Transaction priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse a priority name. Matching is exact, as on the wire.
    pub fn from_str(s: &str) -> Option<Priority> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Priority::Low => 1.0,
            Priority::Medium => 1.5,
            Priority::High => 2.0,
        }
    }

    pub fn estimated_time(self) -> &'static str {
        match self {
            Priority::Low => "30-60 minutes",
            Priority::Medium => "10-30 minutes",
            Priority::High => "5-15 minutes",
        }
    }
}

/// Estimate the fee for sending `amount` at `priority`.
///
/// An unknown priority is charged the base fee with the default window.
pub fn estimate(
    base_fee: f64,
    currency: Option<String>,
    amount: f64,
    priority: Option<&str>,
) -> FeeEstimate {
    let priority = priority.and_then(Priority::from_str);
    let fee = base_fee * priority.map_or(1.0, Priority::multiplier);

    FeeEstimate {
        currency,
        amount,
        fee,
        total: amount + fee,
        estimated_time: priority
            .map_or(DEFAULT_ESTIMATED_TIME, Priority::estimated_time)
            .to_string(),
    }
}
