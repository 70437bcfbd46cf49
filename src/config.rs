// Runtime configuration, read once at startup and passed down explicitly

use axum::http::{header, HeaderValue, Method};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::cookie::{CookieConfig, DEFAULT_COOKIE_MAX_AGE_SECONDS};
use crate::auth::token::DEFAULT_TOKEN_TTL_SECONDS;

/// Signing key used outside production when JWT_SECRET is unset
const DEV_JWT_SECRET: &str = "dev-only-secret-change-me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value.unwrap_or_default().to_ascii_lowercase().as_str() {
            "production" | "prod" => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, AppEnv::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// `None` runs against the in-memory repository
    pub database_url: Option<String>,
    pub app_env: AppEnv,
    pub jwt_secret: String,
    pub jwt_expires_in: i64,
    pub cookie_max_age: i64,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load from the process environment (after `.env`, if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|value| !value.trim().is_empty());

        let app_env = AppEnv::parse(get("APP_ENV"));

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match get("PORT") {
            Some(port) => port.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if app_env.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            None => DEV_JWT_SECRET.to_string(),
        };

        let jwt_expires_in = parse_positive_seconds(get("JWT_EXPIRES_IN"), "JWT_EXPIRES_IN")?
            .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);
        let cookie_max_age = parse_positive_seconds(get("COOKIE_MAX_AGE"), "COOKIE_MAX_AGE")?
            .unwrap_or(DEFAULT_COOKIE_MAX_AGE_SECONDS);

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            database_url: get("DATABASE_URL"),
            app_env,
            jwt_secret,
            jwt_expires_in,
            cookie_max_age,
            cors_allowed_origins,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Cookie flags: always HttpOnly + SameSite=Strict, Secure in production
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            http_only: true,
            secure: self.app_env.is_production(),
            max_age_seconds: self.cookie_max_age,
        }
    }

    /// With explicit origins, credentials (the token cookie) are allowed.
    /// Without, any origin is allowed and browsers will not send cookies.
    pub fn cors_layer(&self) -> CorsLayer {
        if self.cors_allowed_origins.is_empty() {
            return CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
        }

        let origins: Vec<HeaderValue> = self
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}

fn parse_positive_seconds(
    value: Option<String>,
    key: &'static str,
) -> Result<Option<i64>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(seconds) if seconds > 0 => Ok(Some(seconds)),
            _ => Err(ConfigError::Invalid(key)),
        },
    }
}
