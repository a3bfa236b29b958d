//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Everything here is constructed once in
//! [`bootstrap`](crate::bootstrap) and immutable afterwards; the only
//! interior mutability is the bank directory's snapshot swap.

use std::path::PathBuf;
use std::sync::Arc;

use entauth_core::DirectoryCache;
use entauth_crypto::TokenCodec;
use entauth_gateway::EnterpriseAuthClient;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 2342;

/// Default location of the bank directory file.
pub const DEFAULT_BANK_JSON_PATH: &str = "config/bank.json";

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// `APP_ENV=dev`: internal error details are disclosed in responses.
    Development,
    /// Anything else.
    #[default]
    Production,
}

impl Environment {
    pub fn from_app_env(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("dev") => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    pub environment: Environment,
    /// Path of the bank code → bank name JSON file.
    pub bank_json_path: PathBuf,
}

impl AppConfig {
    /// Read `PORT`, `APP_ENV`, and `BANK_JSON_PATH`, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            environment: Environment::from_app_env(std::env::var("APP_ENV").ok().as_deref()),
            bank_json_path: std::env::var("BANK_JSON_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_BANK_JSON_PATH)),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: Environment::Production,
            bank_json_path: PathBuf::from(DEFAULT_BANK_JSON_PATH),
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Bearer token codec holding the process secret.
    pub tokens: Arc<TokenCodec>,
    /// Gateway client; `None` disables the verification endpoint (503).
    pub gateway: Option<Arc<EnterpriseAuthClient>>,
    /// Bank code → bank name directory.
    pub banks: Arc<DirectoryCache>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        tokens: TokenCodec,
        gateway: Option<EnterpriseAuthClient>,
    ) -> Self {
        let banks = Arc::new(DirectoryCache::new(config.bank_json_path.clone()));
        Self {
            config,
            tokens: Arc::new(tokens),
            gateway: gateway.map(Arc::new),
            banks,
        }
    }
}
