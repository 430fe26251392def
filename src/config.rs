// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! configuration structs built from them. Configuration is loaded from the
//! environment once at startup and is read-only afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TG_BOT_TOKEN` | Telegram bot token | Required for submissions |
//! | `TG_CHAT_ID` | Destination chat/channel id | Required for submissions |
//! | `TELEGRAM_API_BASE_URL` | Bot API base URL | `https://api.telegram.org` |
//! | `TELEGRAM_TIMEOUT_SECS` | Outbound request timeout | None (transport default) |
//! | `MAX_PROOF_BYTES` | Maximum decoded proof attachment size | `10485760` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` | PEM certificate chain, enables TLS with `TLS_KEY_PATH` | Unset |
//! | `TLS_KEY_PATH` | PEM private key, enables TLS with `TLS_CERT_PATH` | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Missing Telegram credentials do not stop the process from starting. Every
//! submission fails with "Telegram config missing" instead, and the readiness
//! probe reports the service as degraded.

use std::{fmt, net::SocketAddr, path::PathBuf, time::Duration};

use url::Url;

pub const TG_BOT_TOKEN_ENV: &str = "TG_BOT_TOKEN";
pub const TG_CHAT_ID_ENV: &str = "TG_CHAT_ID";
pub const TELEGRAM_API_BASE_URL_ENV: &str = "TELEGRAM_API_BASE_URL";
pub const TELEGRAM_TIMEOUT_SECS_ENV: &str = "TELEGRAM_TIMEOUT_SECS";
pub const MAX_PROOF_BYTES_ENV: &str = "MAX_PROOF_BYTES";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

/// Default cap on the decoded proof attachment (10 MiB).
///
/// Telegram accepts bot uploads up to 50 MB, but the whole base64 body is
/// buffered in memory per request, so the default stays well below that.
pub const DEFAULT_MAX_PROOF_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Extra request body allowance on top of the base64-encoded proof, covering
/// the JSON envelope and the text fields.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("{0} and {1} must be set together")]
    Incomplete(&'static str, &'static str),
}

/// Bot token and destination chat resolved for a single submission.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Settings consumed by the relay pipeline.
#[derive(Clone)]
pub struct RelayConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base_url: Url,
    /// `None` leaves the HTTP client on its transport default.
    pub request_timeout: Option<Duration>,
    pub max_proof_bytes: usize,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .field("max_proof_bytes", &self.max_proof_bytes)
            .finish()
    }
}

impl RelayConfig {
    /// Builds a config with the given credentials and defaults for the rest.
    pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            bot_token,
            chat_id,
            api_base_url: default_api_base_url(),
            request_timeout: None,
            max_proof_bytes: DEFAULT_MAX_PROOF_BYTES,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the config through `lookup`, which maps a variable name to its
    /// raw value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = match non_empty(&lookup, TELEGRAM_API_BASE_URL_ENV) {
            Some(raw) => parse_base_url(&raw)?,
            None => default_api_base_url(),
        };

        let request_timeout = parse_optional::<u64, _>(&lookup, TELEGRAM_TIMEOUT_SECS_ENV)?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let max_proof_bytes = parse_optional::<usize, _>(&lookup, MAX_PROOF_BYTES_ENV)?
            .unwrap_or(DEFAULT_MAX_PROOF_BYTES);

        Ok(Self {
            bot_token: non_empty(&lookup, TG_BOT_TOKEN_ENV),
            chat_id: non_empty(&lookup, TG_CHAT_ID_ENV),
            api_base_url,
            request_timeout,
            max_proof_bytes,
        })
    }

    /// Both credentials, or `None` if either is missing.
    pub fn credentials(&self) -> Option<TelegramCredentials> {
        match (&self.bot_token, &self.chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramCredentials {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => None,
        }
    }

    /// Request body limit that fits a maximum-size proof once base64-encoded.
    pub fn body_limit(&self) -> usize {
        self.max_proof_bytes
            .div_ceil(3)
            .saturating_mul(4)
            .saturating_add(BODY_OVERHEAD_BYTES)
    }
}

/// Paths to the PEM files used for TLS termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Listener settings for the binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = non_empty(&lookup, HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_optional::<u16, _>(&lookup, PORT_ENV)?.unwrap_or(DEFAULT_PORT);

        let addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: HOST_ENV,
                reason: format!("{host}:{port} is not a socket address: {e}"),
            })?;

        let tls = match (
            non_empty(&lookup, TLS_CERT_PATH_ENV),
            non_empty(&lookup, TLS_KEY_PATH_ENV),
        ) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::Incomplete(TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV)),
        };

        let log_format = match non_empty(&lookup, LOG_FORMAT_ENV)
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => LogFormat::Json,
            Some("pretty") | None => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("expected `json` or `pretty`, got `{other}`"),
                })
            }
        };

        Ok(Self {
            addr,
            tls,
            log_format,
        })
    }
}

fn default_api_base_url() -> Url {
    Url::parse(DEFAULT_TELEGRAM_API_BASE_URL).expect("default Telegram API URL is valid")
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name: TELEGRAM_API_BASE_URL_ENV,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid {
            name: TELEGRAM_API_BASE_URL_ENV,
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_optional<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, name)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                name,
                reason: format!("`{raw}`: {e}"),
            })
        })
        .transpose()
}
