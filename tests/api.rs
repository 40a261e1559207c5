// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP-level tests driving the full router in-process.

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use wallet_ledger_server::{
    api::router,
    auth::{issue_token, token::DEFAULT_TOKEN_TTL, verify_token, AuthConfig},
    config::{Config, RateLimitSettings},
    state::AppState,
};

struct TestApp {
    app: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        let state = AppState::from_config(&config);
        Self {
            app: router(state.clone()),
            state,
        }
    }

    fn token(&self, user_id: &str) -> String {
        issue_token(&self.state.auth, user_id, None, DEFAULT_TOKEN_TTL).unwrap()
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn send(&self, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, "/api/transactions/send", Some(token), Some(body))
            .await
    }
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// Transactions
// =============================================================================

#[tokio::test]
async fn send_returns_pending_transaction() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app
        .send(
            &token,
            json!({"walletId": "w1", "toAddress": "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2", "amount": 0.5, "note": "rent"}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Transaction sent successfully");
    let tx = &body["transaction"];
    assert_eq!(tx["status"], "pending");
    assert_eq!(tx["confirmations"], 0);
    assert_eq!(tx["type"], "sent");
    assert_eq!(tx["amount"], 0.5);
    assert_eq!(tx["walletId"], "w1");
    assert_eq!(tx["userId"], "alice");
    assert_eq!(tx["note"], "rent");
    assert_close(&tx["fee"], 0.0001);
    assert_eq!(tx["currency"], "BTC");
    let hash = tx["hash"].as_str().unwrap();
    assert!(hash.starts_with("0x"));
    assert_eq!(hash.len(), 66);
}

#[tokio::test]
async fn send_accepts_numeric_string_amount() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app
        .send(&token, json!({"walletId": "w1", "toAddress": "1Bv", "amount": "0.25"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["transaction"]["amount"], 0.25);
}

#[tokio::test]
async fn send_rejects_invalid_input() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app.send(&token, json!({"walletId": "w1", "amount": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Wallet ID, recipient address, and amount are required");

    let (status, body) = app
        .send(&token, json!({"walletId": "w1", "toAddress": "1Bv", "amount": 0}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Amount must be greater than 0");

    let (status, _) = app
        .send(&token, json!({"walletId": "w1", "toAddress": "1Bv", "amount": -3}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            &token,
            json!({"walletId": "w1", "toAddress": "1Bv", "amount": 1, "note": "x".repeat(501)}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Note cannot exceed 500 characters");

    let (_, list) = app
        .call(Method::GET, "/api/transactions", Some(&token), None)
        .await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new();
    let token = app.token("alice");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/transactions/send")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn transactions_are_scoped_to_their_owner() {
    let app = TestApp::new();
    let alice = app.token("alice");
    let bob = app.token("bob");

    let (_, body) = app
        .send(&alice, json!({"walletId": "w1", "toAddress": "1Bv", "amount": 1}))
        .await;
    let id = body["transaction"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .call(Method::GET, &format!("/api/transactions/{id}"), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());

    let (status, body) = app
        .call(Method::GET, &format!("/api/transactions/{id}"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Transaction not found");

    let (status, _) = app
        .call(Method::GET, &format!("/api/transactions/{id}/status"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app
        .call(Method::GET, "/api/transactions", Some(&bob), None)
        .await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, _) = app
        .call(Method::GET, "/api/transactions/does-not-exist", Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = TestApp::new();
    let token = app.token("alice");

    let mut ids = Vec::new();
    for amount in [1, 2, 3] {
        let (_, body) = app
            .send(&token, json!({"walletId": "w1", "toAddress": "1Bv", "amount": amount}))
            .await;
        ids.push(body["transaction"]["id"].as_str().unwrap().to_string());
    }

    let (status, list) = app
        .call(Method::GET, "/api/transactions", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|tx| tx["id"].as_str().unwrap())
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);
}

#[tokio::test(start_paused = true)]
async fn status_confirms_after_delay() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (_, body) = app
        .send(&token, json!({"walletId": "w1", "toAddress": "1Bv", "amount": 1}))
        .await;
    let id = body["transaction"]["id"].as_str().unwrap().to_string();
    let status_uri = format!("/api/transactions/{id}/status");
    settle().await;

    let (status, body) = app.call(Method::GET, &status_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["confirmations"], 0);
    assert_eq!(body["id"], id.as_str());
    assert!(body.get("amount").is_none());

    tokio::time::advance(Duration::from_secs(29)).await;
    settle().await;
    let (_, body) = app.call(Method::GET, &status_uri, Some(&token), None).await;
    assert_eq!(body["status"], "pending");

    tokio::time::advance(Duration::from_secs(1)).await;
    settle().await;
    let (_, body) = app.call(Method::GET, &status_uri, Some(&token), None).await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["confirmations"], 6);
}

#[tokio::test(start_paused = true)]
async fn confirmation_settings_come_from_config() {
    let app = TestApp::with_config(Config {
        confirmation_delay: Duration::from_secs(5),
        confirmation_count: 12,
        ..Config::default()
    });
    let token = app.token("alice");

    let (_, body) = app
        .send(&token, json!({"walletId": "w1", "toAddress": "1Bv", "amount": 1}))
        .await;
    let id = body["transaction"]["id"].as_str().unwrap().to_string();
    settle().await;

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    let (_, body) = app
        .call(Method::GET, &format!("/api/transactions/{id}"), Some(&token), None)
        .await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["confirmations"], 12);
}

#[tokio::test]
async fn estimate_fee_follows_priority() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app
        .call(
            Method::POST,
            "/api/transactions/estimate-fee",
            Some(&token),
            Some(json!({"currency": "BTC", "amount": 1, "priority": "medium"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currency"], "BTC");
    assert_eq!(body["amount"], 1.0);
    assert_close(&body["fee"], 0.0001 * 1.5);
    assert_close(&body["total"], 1.0 + 0.0001 * 1.5);
    assert_eq!(body["estimatedTime"], "10-30 minutes");

    let (_, body) = app
        .call(
            Method::POST,
            "/api/transactions/estimate-fee",
            Some(&token),
            Some(json!({"currency": "BTC", "amount": 1, "priority": "high"})),
        )
        .await;
    assert_close(&body["fee"], 0.0002);
    assert_eq!(body["estimatedTime"], "5-15 minutes");

    let (status, _) = app
        .call(
            Method::POST,
            "/api/transactions/estimate-fee",
            Some(&token),
            Some(json!({"currency": "BTC", "amount": "lots"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api/transactions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access token required");

    let (status, _) = app.call(Method::GET, "/api/wallets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_is_forbidden() {
    let app = TestApp::new();

    let (status, _) = app
        .call(Method::GET, "/api/transactions", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let foreign = issue_token(
        &AuthConfig::from_secret("some-other-secret"),
        "alice",
        None,
        DEFAULT_TOKEN_TTL,
    )
    .unwrap();
    let (status, _) = app
        .call(Method::GET, "/api/transactions", Some(&foreign), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// =============================================================================
// Accounts
// =============================================================================

async fn register(app: &TestApp, email: &str) -> (StatusCode, Value) {
    app.call(
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"name": "Alice", "email": email, "password": "hunter22"})),
    )
    .await
}

#[tokio::test]
async fn register_returns_token_and_user() {
    let app = TestApp::new();

    let (status, body) = register(&app, "Alice@Example.com").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    let user = &body["user"];
    assert_eq!(user["name"], "Alice");
    assert_eq!(user["email"], "alice@example.com");
    assert!(user["createdAt"].is_string());
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let claims = verify_token(&app.state.auth, body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.user_id, user["id"].as_str().unwrap());
    assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
    let ttl = claims.expires_at - chrono::Utc::now().timestamp();
    assert!((23 * 3600..=24 * 3600).contains(&ttl), "{ttl}");
}

#[tokio::test]
async fn register_validates_input() {
    let app = TestApp::new();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": "Alice", "email": "alice@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");

    let (status, _) = register(&app, "alice@example.com").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = register(&app, " ALICE@example.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn login_checks_credentials() {
    let app = TestApp::new();
    register(&app, "alice@example.com").await;

    let login = |email: &'static str, password: &'static str| {
        app.call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        )
    };

    let (status, body) = login("alice@example.com", "hunter22").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["token"].is_string());

    let (status, body) = login("alice@example.com", "wrong").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = login("bob@example.com", "hunter22").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = app
        .call(Method::POST, "/api/auth/login", None, Some(json!({"email": "alice@example.com"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required");
}

#[tokio::test]
async fn me_returns_the_registered_user() {
    let app = TestApp::new();
    let (_, body) = register(&app, "alice@example.com").await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.call(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], body["user"]["id"]);
    assert_eq!(me["email"], "alice@example.com");

    let (status, _) = app.call(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid token for an id that never registered.
    let (status, body) = app
        .call(Method::GET, "/api/auth/me", Some(&app.token("ghost")), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn registered_token_owns_wallets() {
    let app = TestApp::new();
    let (_, body) = register(&app, "alice@example.com").await;
    let token = body["token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, wallet) = app
        .call(
            Method::POST,
            "/api/wallets",
            Some(&token),
            Some(json!({"name": "Main", "currency": "BTC", "type": "hot"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(wallet["userId"], user_id.as_str());
}

// =============================================================================
// Wallets
// =============================================================================

#[tokio::test]
async fn wallet_lifecycle() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app
        .call(
            Method::POST,
            "/api/wallets",
            Some(&token),
            Some(json!({"name": "Savings", "currency": "ETH", "type": "cold"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Wallet created successfully");
    assert_eq!(body["currency"], "ETH");
    assert_eq!(body["type"], "cold");
    assert_eq!(body["balance"], 0.0);
    let address = body["address"].as_str().unwrap().to_string();
    assert!(address.starts_with("0x"));
    assert_eq!(address.len(), 42);
    let id = body["id"].as_str().unwrap().to_string();
    let wallet_uri = format!("/api/wallets/{id}");

    let (_, list) = app.call(Method::GET, "/api/wallets", Some(&token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = app
        .call(Method::PUT, &wallet_uri, Some(&token), Some(json!({"name": "Cold storage"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Cold storage");
    assert!(body["updatedAt"].is_string());

    let (status, body) = app
        .call(Method::POST, &format!("{wallet_uri}/address"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["address"].as_str().unwrap();
    assert!(fresh.starts_with("0x"));
    assert_ne!(fresh, address);

    let (_, body) = app.call(Method::GET, &wallet_uri, Some(&token), None).await;
    assert_eq!(body["address"], address.as_str());

    let (status, body) = app.call(Method::DELETE, &wallet_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Wallet deleted successfully");

    let (status, body) = app.call(Method::GET, &wallet_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Wallet not found");
}

#[tokio::test]
async fn wallet_create_validates_input() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app
        .call(Method::POST, "/api/wallets", Some(&token), Some(json!({"name": "Savings"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name, currency, and type are required");

    let (status, _) = app
        .call(
            Method::POST,
            "/api/wallets",
            Some(&token),
            Some(json!({"name": "a".repeat(51), "currency": "BTC", "type": "hot"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/wallets",
            Some(&token),
            Some(json!({"name": "Savings", "currency": "DOGE", "type": "hot"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wallets_are_scoped_to_their_owner() {
    let app = TestApp::new();
    let alice = app.token("alice");
    let bob = app.token("bob");

    let (_, body) = app
        .call(
            Method::POST,
            "/api/wallets",
            Some(&alice),
            Some(json!({"name": "Daily", "currency": "BTC", "type": "hot"})),
        )
        .await;
    let id = body["id"].as_str().unwrap().to_string();
    let wallet_uri = format!("/api/wallets/{id}");

    for (method, uri) in [
        (Method::GET, wallet_uri.clone()),
        (Method::DELETE, wallet_uri.clone()),
        (Method::POST, format!("{wallet_uri}/address")),
        (Method::GET, format!("{wallet_uri}/transactions")),
    ] {
        let (status, _) = app.call(method, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    let (status, _) = app
        .call(Method::PUT, &wallet_uri, Some(&bob), Some(json!({"name": "Mine now"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.call(Method::GET, &wallet_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Daily");
}

#[tokio::test]
async fn sends_from_registered_wallet_use_its_currency_and_address() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (_, body) = app
        .call(
            Method::POST,
            "/api/wallets",
            Some(&token),
            Some(json!({"name": "Litecoin", "currency": "LTC", "type": "hot"})),
        )
        .await;
    let wallet_id = body["id"].as_str().unwrap().to_string();
    let address = body["address"].as_str().unwrap().to_string();

    let (_, body) = app
        .send(&token, json!({"walletId": wallet_id, "toAddress": "Lxyz", "amount": 2}))
        .await;
    assert_eq!(body["transaction"]["currency"], "LTC");
    assert_eq!(body["transaction"]["fromAddress"], address.as_str());

    app.send(&token, json!({"walletId": "elsewhere", "toAddress": "1Bv", "amount": 1}))
        .await;

    let (status, list) = app
        .call(
            Method::GET,
            &format!("/api/wallets/{wallet_id}/transactions"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["walletId"], wallet_id.as_str());
}

// =============================================================================
// Health and docs
// =============================================================================

#[tokio::test]
async fn health_routes_are_public() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = app.call(Method::GET, "/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call(Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new();

    let request = Request::builder()
        .uri("/health/live")
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/health/live")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api-doc/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/transactions/send"].is_object());
}

// =============================================================================
// Market data
// =============================================================================

#[tokio::test]
async fn prices_list_every_asset() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api/crypto/prices", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bitcoin"]["usd"], 45000.0);
    assert_eq!(body["ethereum"]["usd"], 3200.0);
    assert_eq!(body["litecoin"]["usd"], 180.0);
    assert_eq!(body["bitcoin-cash"]["usd"], 520.0);
    let change = body["bitcoin"]["change_24h"].as_f64().unwrap();
    assert!((-5.0..5.0).contains(&change));
}

#[tokio::test]
async fn price_and_market_by_symbol() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api/crypto/price/eth", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "ETH");
    assert_eq!(body["usd"], 3200.0);
    assert!(body["last_updated"].is_string());

    let (status, body) = app.call(Method::GET, "/api/crypto/market/BCH", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bitcoin Cash");
    assert_eq!(body["current_price"], 520.0);
    assert_close(&body["market_cap"], 520.0 * 19_000_000.0);
    assert_close(&body["volume_24h"], 520.0 * 50_000.0);

    for uri in ["/api/crypto/price/DOGE", "/api/crypto/market/doge", "/api/crypto/history/ADA"] {
        let (status, body) = app.call(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], "Cryptocurrency not found");
    }
}

#[tokio::test]
async fn history_defaults_to_a_week() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api/crypto/history/btc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "BTC");
    assert_eq!(body["days"], 7);
    assert_eq!(body["history"].as_array().unwrap().len(), 8);

    let (_, body) = app
        .call(Method::GET, "/api/crypto/history/LTC?days=30", None, None)
        .await;
    assert_eq!(body["history"].as_array().unwrap().len(), 31);

    let (status, _) = app
        .call(Method::GET, "/api/crypto/history/LTC?days=abc", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .call(Method::GET, "/api/crypto/history/LTC?days=366", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Routing and rate limiting
// =============================================================================

#[tokio::test]
async fn unknown_api_route_is_a_json_404() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api/nope?x=1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "API route not found");
    assert_eq!(body["path"], "/api/nope?x=1");

    // Unknown routes do not require a token.
    let (status, _) = app
        .call(Method::GET, "/api/wallets/w1/nothing/here", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn get_from(app: &TestApp, uri: &str, client: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(uri)
        .header("x-forwarded-for", client)
        .body(Body::empty())
        .unwrap();
    app.app.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn api_requests_are_rate_limited_per_client() {
    let app = TestApp::with_config(Config {
        rate_limit: RateLimitSettings {
            window: Duration::from_secs(60),
            max_requests: 2,
        },
        ..Config::default()
    });

    for _ in 0..2 {
        let response = get_from(&app, "/api/health", "203.0.113.1").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_from(&app, "/api/crypto/prices", "203.0.113.1").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=30).contains(&retry_after), "{retry_after}");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body["message"],
        "Too many requests from this IP, please try again later."
    );
    assert_eq!(body["retryAfter"], retry_after);

    // Other clients and non-API routes are unaffected.
    let response = get_from(&app, "/api/health", "203.0.113.2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_from(&app, "/health/live", "203.0.113.1").await;
    assert_eq!(response.status(), StatusCode::OK);
}
