//! Server configuration

use std::time::Duration;

use super::BoxError;

/// Server configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL (e.g. `sqlite:bazaar.db`)
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 signing key for bearer tokens
    pub jwt_secret: String,
    /// Token lifetime
    pub jwt_expiration_minutes: i64,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    /// Upper bound for one checkout transaction
    pub checkout_timeout_ms: u64,
    /// Upper bound for one HTTP request
    pub request_timeout_ms: u64,
    /// SQLite pool size
    pub db_max_connections: u32,
    pub log_level: String,
    /// Daily rolling log files are written here when the directory exists
    pub log_dir: Option<String>,
    /// Bootstrap admin, created on startup when no admin exists
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:bazaar.db".into(),
            http_port: 3000,
            environment: "development".into(),
            jwt_secret: "dev-JWT_SECRET-not-for-production-use".into(),
            jwt_expiration_minutes: 1440,
            jwt_issuer: "bazaar".into(),
            jwt_audience: "bazaar-clients".into(),
            checkout_timeout_ms: 5000,
            request_timeout_ms: 30_000,
            db_max_connections: 8,
            log_level: "info".into(),
            log_dir: None,
            admin_email: None,
            admin_password: None,
        }
    }
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production-use")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = Self::default();

        let jwt_secret = Self::require_secret("JWT_SECRET", &environment)?;
        if environment != "development" && jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters long".into());
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            http_port: Self::parse_env("HTTP_PORT", defaults.http_port),
            environment: environment.clone(),
            jwt_secret,
            jwt_expiration_minutes: Self::parse_env(
                "JWT_EXPIRATION_MINUTES",
                defaults.jwt_expiration_minutes,
            ),
            jwt_issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.jwt_issuer),
            jwt_audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.jwt_audience),
            checkout_timeout_ms: Self::parse_env(
                "CHECKOUT_TIMEOUT_MS",
                defaults.checkout_timeout_ms,
            ),
            request_timeout_ms: Self::parse_env("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            db_max_connections: Self::parse_env("DB_MAX_CONNECTIONS", defaults.db_max_connections)
                .max(1),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
        })
    }

    pub fn checkout_timeout(&self) -> Duration {
        Duration::from_millis(self.checkout_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
