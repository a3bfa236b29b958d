//! HTTP transport and end-to-end exchange orchestration.

use std::sync::Arc;
use std::time::Duration;

use entauth_core::{CallerIdentity, Clock};
use entauth_crypto::GatewayCipher;
use reqwest::header::{HeaderValue, ACCEPT_CHARSET, CONTENT_TYPE};
use reqwest::StatusCode;
use url::Url;

use crate::config::GatewayConfig;
use crate::error::ExchangeError;
use crate::outcome::EnterpriseAuthOutcome;
use crate::request::{ExchangeRequestBuilder, SignedEnvelope};
use crate::response::{ExchangeResponseProcessor, ProcessedExchange};
use crate::types::EnterpriseAuthRequest;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Error bodies are truncated to this many characters before being kept.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Client for the enterprise verification gateway.
///
/// Cheap to share: hold it in an `Arc` and call from any number of tasks.
/// Each call performs exactly one outbound request; dropping the returned
/// future abandons it.
#[derive(Debug)]
pub struct EnterpriseAuthClient {
    http: reqwest::Client,
    endpoint: Url,
    builder: ExchangeRequestBuilder,
    processor: ExchangeResponseProcessor,
}

impl EnterpriseAuthClient {
    pub fn new(
        config: GatewayConfig,
        cipher: Arc<dyn GatewayCipher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ExchangeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ExchangeError::Transport)?;

        tracing::info!(
            endpoint = %config.endpoint,
            cipher = cipher.name(),
            timeout_secs = config.timeout_secs,
            "gateway client configured"
        );

        Ok(Self {
            http,
            endpoint: config.endpoint,
            builder: ExchangeRequestBuilder::new(Arc::clone(&cipher), config.merchant_no, clock),
            processor: ExchangeResponseProcessor::new(cipher),
        })
    }

    /// Run a full verification for `request` on behalf of `caller`.
    ///
    /// Validates the request, performs the exchange, and maps the result.
    /// Validation runs here even when the HTTP layer already checked the
    /// body, so callers outside the API cannot send an invalid request.
    pub async fn verify_enterprise(
        &self,
        request: &EnterpriseAuthRequest,
        caller: &CallerIdentity,
    ) -> Result<EnterpriseAuthOutcome, ExchangeError> {
        request.validate()?;

        let envelope = self.builder.build(request)?;
        tracing::info!(
            user_id = caller.user_id_or_unknown(),
            region_uid = caller.region_uid_or_unknown(),
            order_id = %envelope.order_id,
            "submitting enterprise verification"
        );

        let processed = self.exchange(&envelope).await?;
        let outcome = EnterpriseAuthOutcome::from_exchange(request, &processed)?;

        tracing::info!(
            order_id = %envelope.order_id,
            resp_code = outcome.resp_code.as_deref().unwrap_or(""),
            success = outcome.is_transaction_success,
            charged = outcome.is_charged,
            "enterprise verification completed"
        );
        Ok(outcome)
    }

    /// Transmit a signed envelope and process the verified response.
    pub async fn exchange(&self, envelope: &SignedEnvelope) -> Result<ProcessedExchange, ExchangeError> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
            .header(ACCEPT_CHARSET, HeaderValue::from_static("UTF-8"))
            .body(envelope.to_form())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(order_id = %envelope.order_id, error = %e, "gateway request failed");
                ExchangeError::Transport(e)
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(
                order_id = %envelope.order_id,
                status = status.as_u16(),
                "gateway returned non-200 status"
            );
            return Err(ExchangeError::GatewayHttpError {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = resp.text().await.map_err(ExchangeError::Transport)?;
        self.processor.process(&body)
    }
}
