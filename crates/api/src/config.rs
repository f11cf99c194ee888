use std::num::NonZeroUsize;

use axum::http::HeaderValue;

/// Name of the optional webhook setting; also reported by the disabled
/// notifier when it is absent.
pub const WEBHOOK_URL_VAR: &str = "WEBHOOK_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields except `database_url` have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL connection string (required).
    pub database_url: String,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long cached list/detail views stay fresh (default: `3600`).
    pub view_cache_ttl_secs: u64,
    /// Most entries each view cache holds before evicting (default: `256`).
    pub view_cache_capacity: NonZeroUsize,
    /// Workflow-tool webhook. When absent, notifications are skipped.
    pub webhook_url: Option<String>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `DATABASE_URL`         | required                   |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `VIEW_CACHE_TTL_SECS`  | `3600`                     |
    /// | `VIEW_CACHE_CAPACITY`  | `256`                      |
    /// | `WEBHOOK_URL`          | unset (notifications off)  |
    /// | `LOG_FORMAT`           | `text` (or `json`)         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_var("PORT", var("PORT"), 3000u16)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                name: "CORS_ORIGINS",
                value: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        let request_timeout_secs =
            parse_var("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 30u64)?;
        let view_cache_ttl_secs =
            parse_var("VIEW_CACHE_TTL_SECS", var("VIEW_CACHE_TTL_SECS"), 3600u64)?;
        let view_cache_capacity = parse_var(
            "VIEW_CACHE_CAPACITY",
            var("VIEW_CACHE_CAPACITY"),
            NonZeroUsize::new(256).unwrap_or(NonZeroUsize::MIN),
        )?;
        let webhook_url = var(WEBHOOK_URL_VAR).map(|v| v.trim().to_string());

        let log_format = match var("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::Text,
            Some(v) if v == "text" => LogFormat::Text,
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: v,
                    reason: "expected 'text' or 'json'".into(),
                })
            }
        };

        Ok(Self {
            database_url,
            host,
            port,
            cors_origins,
            request_timeout_secs,
            view_cache_ttl_secs,
            view_cache_capacity,
            webhook_url,
            log_format,
        })
    }
}

fn parse_var<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
