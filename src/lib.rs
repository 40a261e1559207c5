// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Ledger Server - Demo Crypto Wallet Backend
//!
//! This crate provides a REST backend for a demo crypto wallet: a wallet
//! registry, user accounts, mock market prices and a transaction ledger whose
//! entries confirm on a timer. Nothing touches a real chain; hashes and
//! addresses are random.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token authentication (HS256 JWT), password hashing
//! - `ledger` - Transaction ledger, fee estimation, confirmation scheduling
//! - `prices` - Mock market data
//! - `storage` - In-memory stores behind async traits

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod ledger;
pub mod models;
pub mod prices;
pub mod server;
pub mod state;
pub mod storage;
pub mod telemetry;
