//! # Startup Bootstrap
//!
//! Builds [`AppState`] from the environment. Runs once, before the listener
//! binds.
//!
//! ## Sequence
//!
//! 1. **Load token secret** from `JWT_SECRET`. Missing or blank is fatal.
//! 2. **Configure gateway** from `UNIONPAY_3060_API` / `MERCHANT_NO`. An
//!    absent endpoint leaves the verification endpoint disabled.
//! 3. **Select cipher**: the loopback cipher when `APP_ENV=dev` and
//!    `GATEWAY_LOOPBACK_KEY` is set. Without a cipher the gateway stays
//!    disabled.

use std::sync::Arc;

use entauth_core::{Clock, SystemClock};
use entauth_crypto::{CryptoError, GatewayCipher, LoopbackCipher, SecretKey, TokenCodec};
use entauth_gateway::{ConfigError, EnterpriseAuthClient, ExchangeError, GatewayConfig};

use crate::state::{AppConfig, AppState, Environment};

/// Environment variable holding the token secret.
pub const JWT_SECRET_VAR: &str = "JWT_SECRET";

/// Environment variable holding the development loopback cipher key.
pub const LOOPBACK_KEY_VAR: &str = "GATEWAY_LOOPBACK_KEY";

/// Errors during startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("token secret: {0}")]
    Secret(#[from] CryptoError),

    #[error("gateway configuration: {0}")]
    GatewayConfig(#[from] ConfigError),

    #[error("gateway client: {0}")]
    GatewayClient(#[from] ExchangeError),
}

/// Build the application state from environment variables.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let tokens = TokenCodec::new(SecretKey::from_env(JWT_SECRET_VAR)?, Arc::clone(&clock));

    let gateway = match GatewayConfig::from_env()? {
        Some(gateway_config) => match select_cipher(config.environment)? {
            Some(cipher) => Some(EnterpriseAuthClient::new(gateway_config, cipher, clock)?),
            None => {
                tracing::warn!(
                    "gateway endpoint configured but no cipher is available; \
                     enterprise verification will return 503"
                );
                None
            }
        },
        None => {
            tracing::warn!("UNIONPAY_3060_API not set; enterprise verification will return 503");
            None
        }
    };

    tracing::info!(
        port = config.port,
        environment = ?config.environment,
        bank_json_path = %config.bank_json_path.display(),
        gateway = gateway.is_some(),
        "bootstrap complete"
    );

    Ok(AppState::new(config, tokens, gateway))
}

fn select_cipher(environment: Environment) -> Result<Option<Arc<dyn GatewayCipher>>, BootstrapError> {
    let has_loopback_key = std::env::var(LOOPBACK_KEY_VAR).is_ok();
    if !has_loopback_key {
        return Ok(None);
    }
    if !environment.is_development() {
        tracing::warn!("{LOOPBACK_KEY_VAR} is ignored outside APP_ENV=dev");
        return Ok(None);
    }
    let key = SecretKey::from_env(LOOPBACK_KEY_VAR)?;
    tracing::warn!("using loopback gateway cipher; responses are not from a real gateway");
    Ok(Some(Arc::new(LoopbackCipher::new(key))))
}
