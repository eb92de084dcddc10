use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_SEARCH_URL: &str = "https://api.mercadolibre.com/sites/MLM/search";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Settings shared by the search client and the listing page fetcher.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub search_url: String,
    pub user_agent: String,
    pub fetch_timeout: Duration,
    pub max_attempts: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl IngestConfig {
    /// Read configuration from environment variables.
    ///
    /// - `MERCADO_SEARCH_URL` (optional)
    /// - `MERCADO_USER_AGENT` (optional)
    /// - `MERCADO_FETCH_TIMEOUT_SECS` (optional, defaults to 10)
    /// - `MERCADO_MAX_ATTEMPTS` (optional, defaults to 3)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let search_url = lookup("MERCADO_SEARCH_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string());
        let user_agent = lookup("MERCADO_USER_AGENT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let timeout_secs = parse_positive(
            "MERCADO_FETCH_TIMEOUT_SECS",
            lookup("MERCADO_FETCH_TIMEOUT_SECS"),
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?;
        let max_attempts = parse_positive(
            "MERCADO_MAX_ATTEMPTS",
            lookup("MERCADO_MAX_ATTEMPTS"),
            u64::from(DEFAULT_MAX_ATTEMPTS),
        )?;
        let max_attempts = u32::try_from(max_attempts).map_err(|_| {
            AppError::ConfigError(format!("MERCADO_MAX_ATTEMPTS '{max_attempts}' is too large"))
        })?;

        Ok(Self {
            search_url,
            user_agent,
            fetch_timeout: Duration::from_secs(timeout_secs),
            max_attempts,
        })
    }
}

fn parse_positive(key: &str, raw: Option<String>, default: u64) -> Result<u64, AppError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let parsed: u64 = raw.trim().parse().map_err(|_| {
        AppError::ConfigError(format!("Invalid {key} '{raw}': must be a positive integer"))
    })?;
    if parsed == 0 {
        return Err(AppError::ConfigError(format!("{key} must be at least 1")));
    }
    Ok(parsed)
}
