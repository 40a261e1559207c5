// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet management API endpoints.
//!
//! These endpoints handle wallet creation, listing, retrieval, renaming and
//! deletion. All operations require authentication and enforce ownership:
//! a wallet owned by another user is reported as not found.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    auth::Auth,
    error::ApiError,
    identifiers,
    models::{
        CreateWalletRequest, CreateWalletResponse, DeleteWalletResponse, NewAddressResponse,
        UpdateWalletRequest,
    },
    state::AppState,
    storage::{Currency, OwnedBy, TransactionRecord, WalletKind, WalletRecord},
};

/// Maximum wallet name length, in characters.
pub const MAX_WALLET_NAME_LEN: usize = 50;

const WALLET_NOT_FOUND: &str = "Wallet not found";

/// A create request that passed validation.
#[derive(Debug, PartialEq)]
struct NewWallet {
    name: String,
    currency: Currency,
    kind: WalletKind,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.chars().count() > MAX_WALLET_NAME_LEN {
        return Err(ApiError::bad_request(
            "Wallet name cannot exceed 50 characters",
        ));
    }
    Ok(())
}

fn validate_create(request: &CreateWalletRequest) -> Result<NewWallet, ApiError> {
    let (Some(name), Some(currency), Some(kind)) = (
        non_blank(request.name.as_deref()),
        non_blank(request.currency.as_deref()),
        non_blank(request.kind.as_deref()),
    ) else {
        return Err(ApiError::bad_request(
            "Name, currency, and type are required",
        ));
    };

    validate_name(name)?;
    let currency = Currency::from_code(currency)
        .ok_or_else(|| ApiError::bad_request(format!("Unsupported currency: {currency}")))?;
    let kind = WalletKind::from_str(kind)
        .ok_or_else(|| ApiError::bad_request("Wallet type must be 'hot' or 'cold'"))?;

    Ok(NewWallet {
        name: name.to_string(),
        currency,
        kind,
    })
}

/// Load a wallet the caller owns.
async fn owned_wallet(state: &AppState, wallet_id: &str, user_id: &str) -> Result<WalletRecord, ApiError> {
    state
        .wallets
        .get(wallet_id)
        .await?
        .owned_by(user_id)
        .ok_or_else(|| ApiError::not_found(WALLET_NOT_FOUND))
}

/// List the caller's wallets, oldest first.
#[utoipa::path(
    get,
    path = "/api/wallets",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of wallets", body = [WalletRecord]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_wallets(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<WalletRecord>>, ApiError> {
    let wallets = state.wallets.list_by_owner(&user.user_id).await?;
    Ok(Json(wallets))
}

/// Create a new wallet for the caller.
///
/// The wallet gets a mock address in its currency's format and a zero
/// balance. No key material is generated.
#[utoipa::path(
    post,
    path = "/api/wallets",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    request_body = CreateWalletRequest,
    responses(
        (status = 201, description = "Wallet created successfully", body = CreateWalletResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<CreateWalletRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateWalletResponse>), ApiError> {
    let Json(request) = body?;
    let new_wallet = validate_create(&request)?;

    let address = identifiers::wallet_address(&state.rng, new_wallet.currency)
        .map_err(|e| ApiError::internal(&format!("Address generation failed: {e}")))?;

    let wallet = WalletRecord {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        name: new_wallet.name,
        currency: new_wallet.currency,
        kind: new_wallet.kind,
        address,
        balance: 0.0,
        created_at: Utc::now(),
        updated_at: None,
    };

    state.wallets.insert(wallet.clone()).await?;

    tracing::info!(
        wallet_id = %wallet.id,
        user_id = %user.user_id,
        currency = %wallet.currency,
        "Wallet created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateWalletResponse {
            message: "Wallet created successfully".to_string(),
            wallet,
        }),
    ))
}

/// Get a wallet by ID.
#[utoipa::path(
    get,
    path = "/api/wallets/{wallet_id}",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    responses(
        (status = 200, description = "Wallet details", body = WalletRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn get_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<WalletRecord>, ApiError> {
    let wallet = owned_wallet(&state, &wallet_id, &user.user_id).await?;
    Ok(Json(wallet))
}

/// Rename a wallet. An absent or blank name keeps the current one.
#[utoipa::path(
    put,
    path = "/api/wallets/{wallet_id}",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    request_body = UpdateWalletRequest,
    responses(
        (status = 200, description = "Updated wallet", body = WalletRecord),
        (status = 400, description = "Invalid name"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn update_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    body: Result<Json<UpdateWalletRequest>, JsonRejection>,
) -> Result<Json<WalletRecord>, ApiError> {
    let Json(request) = body?;
    let mut wallet = owned_wallet(&state, &wallet_id, &user.user_id).await?;

    if let Some(name) = non_blank(request.name.as_deref()) {
        validate_name(name)?;
        wallet.name = name.to_string();
    }
    wallet.updated_at = Some(Utc::now());

    if !state.wallets.update(wallet.clone()).await? {
        // Deleted concurrently.
        return Err(ApiError::not_found(WALLET_NOT_FOUND));
    }

    Ok(Json(wallet))
}

/// Delete a wallet.
///
/// Transactions already sent from it stay in the ledger.
#[utoipa::path(
    delete,
    path = "/api/wallets/{wallet_id}",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    params(
        ("wallet_id" = String, Path, description = "Wallet ID to delete")
    ),
    responses(
        (status = 200, description = "Wallet deleted successfully", body = DeleteWalletResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn delete_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<DeleteWalletResponse>, ApiError> {
    owned_wallet(&state, &wallet_id, &user.user_id).await?;
    state
        .wallets
        .remove(&wallet_id)
        .await?
        .ok_or_else(|| ApiError::not_found(WALLET_NOT_FOUND))?;

    tracing::info!(wallet_id = %wallet_id, user_id = %user.user_id, "Wallet deleted");

    Ok(Json(DeleteWalletResponse {
        message: "Wallet deleted successfully".to_string(),
    }))
}

/// Generate a fresh receiving address for a wallet.
///
/// The address is returned but not stored on the wallet.
#[utoipa::path(
    post,
    path = "/api/wallets/{wallet_id}/address",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    responses(
        (status = 200, description = "New address", body = NewAddressResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn new_address(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<NewAddressResponse>, ApiError> {
    let wallet = owned_wallet(&state, &wallet_id, &user.user_id).await?;
    let address = identifiers::wallet_address(&state.rng, wallet.currency)
        .map_err(|e| ApiError::internal(&format!("Address generation failed: {e}")))?;
    Ok(Json(NewAddressResponse { address }))
}

/// Transactions sent from a wallet, newest first.
#[utoipa::path(
    get,
    path = "/api/wallets/{wallet_id}/transactions",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    params(
        ("wallet_id" = String, Path, description = "Wallet ID")
    ),
    responses(
        (status = 200, description = "Wallet transactions, newest first", body = [TransactionRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn wallet_transactions(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<Vec<TransactionRecord>>, ApiError> {
    let transactions = state
        .ledger
        .list_for_wallet(&wallet_id, &user.user_id)
        .await?;
    Ok(Json(transactions))
}
