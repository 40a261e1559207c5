// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into [`Config`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `JWT_SECRET` | HS256 shared secret for bearer tokens | `your-secret-key` |
//! | `CONFIRMATION_DELAY_SECS` | Seconds until a sent transaction confirms (at most `86400`) | `30` |
//! | `CONFIRMATION_COUNT` | Confirmations reported once confirmed | `6` |
//! | `BASE_FEE` | Network fee and base of fee estimates | `0.0001` |
//! | `DEFAULT_CURRENCY` | Currency recorded for unregistered wallets | `BTC` |
//! | `RATE_LIMIT_WINDOW` | Rate limit window for `/api` in minutes | `15` |
//! | `RATE_LIMIT_MAX` | Requests allowed per client within the window | `100` |
//! | `ALLOWED_ORIGINS` | Comma-separated CORS origins | Any origin |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS with `TLS_KEY_PATH`) | Plain HTTP |
//! | `TLS_KEY_PATH` | PEM private key | Plain HTTP |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::ledger::{
    LedgerSettings, DEFAULT_BASE_FEE, DEFAULT_CONFIRMATION_COUNT, DEFAULT_CONFIRMATION_DELAY,
};
use crate::storage::Currency;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the token signing secret.
///
/// # Security
/// The default secret is public. Any deployment reachable by others MUST
/// set this.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

pub const CONFIRMATION_DELAY_ENV: &str = "CONFIRMATION_DELAY_SECS";
pub const CONFIRMATION_COUNT_ENV: &str = "CONFIRMATION_COUNT";
pub const BASE_FEE_ENV: &str = "BASE_FEE";
pub const RATE_LIMIT_WINDOW_ENV: &str = "RATE_LIMIT_WINDOW";
pub const RATE_LIMIT_MAX_ENV: &str = "RATE_LIMIT_MAX";
pub const DEFAULT_CURRENCY_ENV: &str = "DEFAULT_CURRENCY";
pub const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";
pub const DEFAULT_RATE_LIMIT_WINDOW_MINUTES: u64 = 15;
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;

/// Upper bound for `CONFIRMATION_DELAY_SECS` (one day).
pub const MAX_CONFIRMATION_DELAY: Duration = Duration::from_secs(86_400);

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("Unsupported currency in DEFAULT_CURRENCY: {0:?}")]
    UnsupportedCurrency(String),
    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
    #[error("Invalid bind address {0:?}")]
    InvalidBindAddress(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// PEM files for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Per-client request budget for the `/api` tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_MINUTES * 60),
            max_requests: DEFAULT_RATE_LIMIT_MAX,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// `true` when `JWT_SECRET` was not set and the public default is used.
    pub jwt_secret_is_default: bool,
    pub confirmation_delay: Duration,
    pub confirmation_count: u32,
    pub base_fee: f64,
    pub default_currency: Currency,
    pub rate_limit: RateLimitSettings,
    /// `None` allows any origin.
    pub allowed_origins: Option<Vec<String>>,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_secret_is_default: true,
            confirmation_delay: DEFAULT_CONFIRMATION_DELAY,
            confirmation_count: DEFAULT_CONFIRMATION_COUNT,
            base_fee: DEFAULT_BASE_FEE,
            default_currency: Currency::Btc,
            rate_limit: RateLimitSettings::default(),
            allowed_origins: None,
            tls: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port = match get(PORT_ENV) {
            Some(v) => parse_value(PORT_ENV, &v)?,
            None => defaults.port,
        };

        let (jwt_secret, jwt_secret_is_default) = match get(JWT_SECRET_ENV) {
            Some(secret) => (secret, false),
            None => (defaults.jwt_secret, true),
        };

        let confirmation_delay = match get(CONFIRMATION_DELAY_ENV) {
            Some(v) => {
                let delay = Duration::from_secs(parse_value(CONFIRMATION_DELAY_ENV, &v)?);
                if delay > MAX_CONFIRMATION_DELAY {
                    return Err(ConfigError::InvalidValue {
                        var: CONFIRMATION_DELAY_ENV,
                        value: v,
                    });
                }
                delay
            }
            None => defaults.confirmation_delay,
        };

        let confirmation_count = match get(CONFIRMATION_COUNT_ENV) {
            Some(v) => parse_value(CONFIRMATION_COUNT_ENV, &v)?,
            None => defaults.confirmation_count,
        };

        let base_fee = match get(BASE_FEE_ENV) {
            Some(v) => {
                let fee: f64 = parse_value(BASE_FEE_ENV, &v)?;
                if !fee.is_finite() || fee < 0.0 {
                    return Err(ConfigError::InvalidValue {
                        var: BASE_FEE_ENV,
                        value: v,
                    });
                }
                fee
            }
            None => defaults.base_fee,
        };

        let window = match get(RATE_LIMIT_WINDOW_ENV) {
            Some(v) => match parse_value::<u64>(RATE_LIMIT_WINDOW_ENV, &v)? {
                minutes @ 1..=1440 => Duration::from_secs(minutes * 60),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: RATE_LIMIT_WINDOW_ENV,
                        value: v,
                    })
                }
            },
            None => defaults.rate_limit.window,
        };

        let max_requests = match get(RATE_LIMIT_MAX_ENV) {
            Some(v) => match parse_value::<u32>(RATE_LIMIT_MAX_ENV, &v)? {
                0 => {
                    return Err(ConfigError::InvalidValue {
                        var: RATE_LIMIT_MAX_ENV,
                        value: v,
                    })
                }
                max => max,
            },
            None => defaults.rate_limit.max_requests,
        };

        let default_currency = match get(DEFAULT_CURRENCY_ENV) {
            Some(v) => Currency::from_code(&v).ok_or(ConfigError::UnsupportedCurrency(v))?,
            None => defaults.default_currency,
        };

        let allowed_origins = get(ALLOWED_ORIGINS_ENV).map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or(defaults.host),
            port,
            jwt_secret,
            jwt_secret_is_default,
            confirmation_delay,
            confirmation_count,
            base_fee,
            default_currency,
            rate_limit: RateLimitSettings {
                window,
                max_requests,
            },
            allowed_origins,
            tls,
            log_format,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidBindAddress(addr))
    }

    /// Tunables for the transaction ledger.
    pub fn ledger_settings(&self) -> LedgerSettings {
        LedgerSettings {
            confirmation_delay: self.confirmation_delay,
            confirmation_count: self.confirmation_count,
            base_fee: self.base_fee,
            fallback_currency: self.default_currency,
        }
    }
}

fn parse_value<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}
