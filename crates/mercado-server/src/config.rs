use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use mercado_core::AppError;
use tower_http::cors::CorsLayer;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] =
    &["https://mercado-scraping.shop", "http://mercado-scraping.shop"];

/// Transport settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `MERCADO_SERVER_PORT` (optional, defaults to 5000)
    /// - `MERCADO_ALLOWED_ORIGINS` (optional, comma-separated)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_values(
            std::env::var("MERCADO_SERVER_PORT").ok(),
            std::env::var("MERCADO_ALLOWED_ORIGINS").ok(),
        )
    }

    fn from_values(port: Option<String>, origins: Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(raw) = port {
            config.port = raw.trim().parse().map_err(|_| {
                AppError::ConfigError(format!("Invalid MERCADO_SERVER_PORT '{raw}'"))
            })?;
        }

        if let Some(raw) = origins {
            let parsed: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
            if !parsed.is_empty() {
                config.allowed_origins = parsed;
            }
        }

        Ok(config)
    }

    /// CORS policy: configured origins only, `POST`/`OPTIONS`, credentials allowed.
    pub fn cors_layer(&self) -> Result<CorsLayer, AppError> {
        let origins = self
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin '{o}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .allow_credentials(true))
    }
}
