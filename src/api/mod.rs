// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::OriginalUri,
    http::{HeaderValue, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::require_auth,
    models::{
        AmountInput, AuthResponse, CreateWalletRequest, CreateWalletResponse,
        DeleteWalletResponse, EstimateFeeRequest, FeeEstimate, LoginRequest, MarketData,
        NewAddressResponse, PriceBoard, PriceHistory, PricePoint, PriceQuote, RegisterRequest,
        SendTransactionRequest, SendTransactionResponse, SpotPrice, TransactionStatusResponse,
        UpdateWalletRequest,
    },
    state::AppState,
    storage::{
        Currency, Direction, TransactionRecord, TxStatus, UserRecord, WalletKind, WalletRecord,
    },
};
use rate_limit::limit_requests;

pub mod auth;
pub mod crypto;
#[cfg(feature = "dev")]
pub mod dev;
pub mod health;
pub mod rate_limit;
pub mod transactions;
pub mod wallets;

pub const API_ROUTE_NOT_FOUND: &str = "API route not found";

pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/transactions", get(transactions::list_transactions))
        .route("/transactions/send", post(transactions::send_transaction))
        .route("/transactions/estimate-fee", post(transactions::estimate_fee))
        .route("/transactions/{id}", get(transactions::get_transaction))
        .route("/transactions/{id}/status", get(transactions::transaction_status))
        .route(
            "/wallets",
            get(wallets::list_wallets).post(wallets::create_wallet),
        )
        .route(
            "/wallets/{wallet_id}",
            get(wallets::get_wallet)
                .put(wallets::update_wallet)
                .delete(wallets::delete_wallet),
        )
        .route("/wallets/{wallet_id}/address", post(wallets::new_address))
        .route(
            "/wallets/{wallet_id}/transactions",
            get(wallets::wallet_transactions),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/crypto/prices", get(crypto::prices))
        .route("/crypto/price/{symbol}", get(crypto::price))
        .route("/crypto/market/{symbol}", get(crypto::market))
        .route("/crypto/history/{symbol}", get(crypto::history));
    #[cfg(feature = "dev")]
    let public_routes = public_routes.route("/auth/dev-token", post(dev::issue_dev_token));

    let api_routes = protected_routes
        .merge(public_routes)
        .fallback(api_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), limit_requests));

    let cors = cors_layer(state.allowed_origins.as_deref());

    Router::new()
        .nest("/api", api_routes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}

#[derive(Serialize)]
struct RouteNotFound {
    success: bool,
    message: &'static str,
    path: String,
}

/// JSON 404 for unknown routes under `/api`.
async fn api_not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<RouteNotFound>) {
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
    (
        StatusCode::NOT_FOUND,
        Json(RouteNotFound {
            success: false,
            message: API_ROUTE_NOT_FOUND,
            path,
        }),
    )
}

/// Any origin when unconfigured, otherwise only the listed ones.
fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = allowed_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::me,
        transactions::send_transaction,
        transactions::get_transaction,
        transactions::list_transactions,
        transactions::estimate_fee,
        transactions::transaction_status,
        wallets::list_wallets,
        wallets::create_wallet,
        wallets::get_wallet,
        wallets::update_wallet,
        wallets::delete_wallet,
        wallets::new_address,
        wallets::wallet_transactions,
        crypto::prices,
        crypto::price,
        crypto::market,
        crypto::history,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            TransactionRecord,
            TxStatus,
            Direction,
            WalletRecord,
            Currency,
            WalletKind,
            AmountInput,
            SendTransactionRequest,
            SendTransactionResponse,
            TransactionStatusResponse,
            EstimateFeeRequest,
            FeeEstimate,
            CreateWalletRequest,
            CreateWalletResponse,
            UpdateWalletRequest,
            DeleteWalletResponse,
            NewAddressResponse,
            UserRecord,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            SpotPrice,
            PriceBoard,
            PriceQuote,
            MarketData,
            PricePoint,
            PriceHistory,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Transactions", description = "Send, track and price transactions"),
        (name = "Wallets", description = "Wallet registry"),
        (name = "Crypto", description = "Mock market prices"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
