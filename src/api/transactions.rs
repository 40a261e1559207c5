// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction ledger endpoints.
//!
//! Sending records a pending transaction that confirms on its own after the
//! configured delay. Every lookup is scoped to the caller: a transaction
//! owned by someone else is reported as not found.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        EstimateFeeRequest, FeeEstimate, SendTransactionRequest, SendTransactionResponse,
        TransactionStatusResponse,
    },
    state::AppState,
    storage::TransactionRecord,
};

// =============================================================================
// Handlers
// =============================================================================

/// Send a transaction from one of the caller's wallets.
///
/// The transaction is returned immediately as `pending` with 0
/// confirmations.
#[utoipa::path(
    post,
    path = "/api/transactions/send",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    request_body = SendTransactionRequest,
    responses(
        (status = 201, description = "Transaction sent successfully", body = SendTransactionResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Invalid or expired token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn send_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<SendTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SendTransactionResponse>), ApiError> {
    let Json(request) = body?;
    let transaction = state.ledger.submit(&user.user_id, &request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SendTransactionResponse {
            message: "Transaction sent successfully".to_string(),
            transaction,
        }),
    ))
}

/// Get one of the caller's transactions.
#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction details", body = TransactionRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionRecord>, ApiError> {
    let transaction = state.ledger.get(&id, &user.user_id).await?;
    Ok(Json(transaction))
}

/// List the caller's transactions, newest first.
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transactions, newest first", body = [TransactionRecord]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_transactions(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionRecord>>, ApiError> {
    let transactions = state.ledger.list(&user.user_id).await?;
    Ok(Json(transactions))
}

/// Estimate the network fee for a prospective transaction.
///
/// Pure computation; nothing is recorded.
#[utoipa::path(
    post,
    path = "/api/transactions/estimate-fee",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    request_body = EstimateFeeRequest,
    responses(
        (status = 200, description = "Fee estimate", body = FeeEstimate),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn estimate_fee(
    Auth(_user): Auth,
    State(state): State<AppState>,
    body: Result<Json<EstimateFeeRequest>, JsonRejection>,
) -> Result<Json<FeeEstimate>, ApiError> {
    let Json(request) = body?;
    let estimate = state.ledger.estimate_fee(&request)?;
    Ok(Json(estimate))
}

/// Confirmation status of one of the caller's transactions.
#[utoipa::path(
    get,
    path = "/api/transactions/{id}/status",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction status", body = TransactionStatusResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn transaction_status(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionStatusResponse>, ApiError> {
    let transaction = state.ledger.get(&id, &user.user_id).await?;
    Ok(Json(transaction.into()))
}
