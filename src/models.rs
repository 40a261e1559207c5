// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Field names are camelCase on
//! the wire. Request fields that the service validates itself are optional
//! here so that a missing field is reported as a validation error (400)
//! rather than a deserialization rejection.
//!
//! ## Model Categories
//!
//! - **Transactions**: send, status projection, fee estimation
//! - **Wallets**: creation, rename, address generation
//! - **Auth**: registration and login
//! - **Market**: mock spot prices, market data and price history (snake_case
//!   on the wire)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::storage::{TransactionRecord, TxStatus, UserRecord, WalletRecord};

// =============================================================================
// Amounts
// =============================================================================

/// A decimal amount supplied either as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// Numeric value, if the input parses as a finite number.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            AmountInput::Number(n) => *n,
            AmountInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

// =============================================================================
// Transaction Models
// =============================================================================

/// Request to send a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionRequest {
    /// Wallet to send from.
    pub wallet_id: Option<String>,
    /// Recipient address.
    pub to_address: Option<String>,
    /// Amount to send; must be greater than zero.
    pub amount: Option<AmountInput>,
    /// Optional note (at most 500 characters).
    pub note: Option<String>,
}

/// Response after submitting a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendTransactionResponse {
    /// Message indicating success.
    pub message: String,
    /// The recorded transaction (still pending).
    pub transaction: TransactionRecord,
}

/// Status projection of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionStatusResponse {
    pub id: String,
    pub hash: String,
    pub status: TxStatus,
    pub confirmations: u32,
    pub date: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionStatusResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            hash: record.hash,
            status: record.status,
            confirmations: record.confirmations,
            date: record.date,
        }
    }
}

/// Request to estimate the fee of a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EstimateFeeRequest {
    /// Currency code, echoed back.
    pub currency: Option<String>,
    /// Amount to send.
    pub amount: Option<AmountInput>,
    /// "low", "medium" or "high". Anything else is priced like "low".
    pub priority: Option<String>,
}

/// Fee estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    pub currency: Option<String>,
    pub amount: f64,
    pub fee: f64,
    /// Amount plus fee.
    pub total: f64,
    /// Human-readable confirmation window, e.g. "10-30 minutes".
    pub estimated_time: String,
}

// =============================================================================
// Wallet Models
// =============================================================================

/// Request to create a wallet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    /// Wallet name (at most 50 characters).
    pub name: Option<String>,
    /// Currency code: BTC, ETH, LTC, BCH, ADA or DOT.
    pub currency: Option<String>,
    /// "hot" or "cold".
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Response after creating a wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWalletResponse {
    pub message: String,
    #[serde(flatten)]
    pub wallet: WalletRecord,
}

/// Request to rename a wallet. An absent or blank name keeps the old one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateWalletRequest {
    pub name: Option<String>,
}

/// Response after deleting a wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteWalletResponse {
    pub message: String,
}

/// A freshly generated receiving address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewAddressResponse {
    pub address: String,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request to register an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request to log in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token issued on registration or login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    /// Bearer token, valid for 24 hours.
    pub token: String,
    pub user: UserRecord,
}

// =============================================================================
// Market Models
// =============================================================================

/// Spot price with a simulated 24h change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SpotPrice {
    pub usd: f64,
    /// Percent, within [-5, 5].
    pub change_24h: f64,
}

/// Spot prices of every listed asset, keyed by asset slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceBoard {
    pub bitcoin: SpotPrice,
    pub ethereum: SpotPrice,
    pub litecoin: SpotPrice,
    #[serde(rename = "bitcoin-cash")]
    pub bitcoin_cash: SpotPrice,
}

/// Spot price of one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceQuote {
    pub symbol: String,
    pub usd: f64,
    pub change_24h: f64,
    pub last_updated: DateTime<Utc>,
}

/// Simulated market overview of one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarketData {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub price_change_24h: f64,
    pub price_change_percentage_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub last_updated: DateTime<Utc>,
}

/// Query of the price history route.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Days back from today (default 7, at most 365).
    pub days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    /// USD, rounded to cents.
    pub price: f64,
}

/// Daily simulated prices, oldest first, ending today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceHistory {
    pub symbol: String,
    pub days: u32,
    pub history: Vec<PricePoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_numbers_and_numeric_strings() {
        let n: AmountInput = serde_json::from_str("0.1").unwrap();
        assert_eq!(n.value(), Some(0.1));

        let s: AmountInput = serde_json::from_str(r#"" 2.5 ""#).unwrap();
        assert_eq!(s.value(), Some(2.5));

        let bad: AmountInput = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(bad.value(), None);
    }

    #[test]
    fn send_request_reads_camel_case() {
        let request: SendTransactionRequest = serde_json::from_str(
            r#"{"walletId":"w1","toAddress":"1Bv","amount":0.1,"note":"rent"}"#,
        )
        .unwrap();
        assert_eq!(request.wallet_id.as_deref(), Some("w1"));
        assert_eq!(request.to_address.as_deref(), Some("1Bv"));
        assert_eq!(request.amount.and_then(|a| a.value()), Some(0.1));
        assert_eq!(request.note.as_deref(), Some("rent"));
    }

    #[test]
    fn send_request_tolerates_missing_fields() {
        let request: SendTransactionRequest = serde_json::from_str("{}").unwrap();
        assert!(request.wallet_id.is_none());
        assert!(request.amount.is_none());
    }

    #[test]
    fn create_wallet_response_is_flat() {
        let response = CreateWalletResponse {
            message: "Wallet created successfully".into(),
            wallet: WalletRecord {
                id: "w1".into(),
                user_id: "alice".into(),
                name: "Savings".into(),
                currency: crate::storage::Currency::Btc,
                kind: crate::storage::WalletKind::Hot,
                address: "1abc".into(),
                balance: 0.0,
                created_at: Utc::now(),
                updated_at: None,
            },
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["message"], "Wallet created successfully");
        assert_eq!(json["id"], "w1");
        assert_eq!(json["type"], "hot");
        assert!(json.get("wallet").is_none());
    }

    #[test]
    fn price_board_uses_asset_slugs() {
        let spot = SpotPrice {
            usd: 1.0,
            change_24h: 0.0,
        };
        let board = PriceBoard {
            bitcoin: spot.clone(),
            ethereum: spot.clone(),
            litecoin: spot.clone(),
            bitcoin_cash: spot,
        };
        let json = serde_json::to_value(board).unwrap();
        assert!(json.get("bitcoin-cash").is_some());
        assert_eq!(json["bitcoin"]["change_24h"], 0.0);
    }

    #[test]
    fn fee_estimate_uses_camel_case() {
        let estimate = FeeEstimate {
            currency: Some("BTC".into()),
            amount: 1.0,
            fee: 0.0001,
            total: 1.0001,
            estimated_time: "10-30 minutes".into(),
        };
        let json = serde_json::to_value(estimate).unwrap();
        assert_eq!(json["estimatedTime"], "10-30 minutes");
    }
}
