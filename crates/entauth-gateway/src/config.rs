//! Gateway client configuration.
//!
//! The gateway endpoint is optional: a deployment without
//! `UNIONPAY_3060_API` runs with the exchange endpoint disabled. When the
//! endpoint is set, the merchant number becomes mandatory.

use url::Url;

/// Default outbound request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the verification gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Full URL of the gateway's verification endpoint.
    pub endpoint: Url,
    /// Merchant number assigned by the gateway operator.
    pub merchant_no: String,
    /// Request timeout in seconds, covering connect through body read.
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `UNIONPAY_3060_API` (optional; absent means no gateway)
    /// - `MERCHANT_NO` (required when the endpoint is set)
    /// - `GATEWAY_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let endpoint = match non_blank_env("UNIONPAY_3060_API") {
            Some(raw) => Url::parse(&raw)
                .map_err(|e| ConfigError::InvalidUrl("UNIONPAY_3060_API".into(), e.to_string()))?,
            None => return Ok(None),
        };
        let merchant_no = non_blank_env("MERCHANT_NO").ok_or(ConfigError::MissingMerchantNo)?;

        Ok(Some(Self {
            endpoint,
            merchant_no,
            timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }))
    }

    /// Configuration pointing at a local mock server (for testing).
    pub fn local_mock(base_uri: &str, merchant_no: &str) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(base_uri)
            .and_then(|base| base.join("/gateway/3060"))
            .map_err(|e| ConfigError::InvalidUrl(base_uri.to_string(), e.to_string()))?;
        Ok(Self {
            endpoint,
            merchant_no: merchant_no.to_string(),
            timeout_secs: 5,
        })
    }
}

fn non_blank_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MERCHANT_NO environment variable is required when UNIONPAY_3060_API is set")]
    MissingMerchantNo,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
