//! Inbound response handling: verify, decode, selectively decrypt.
//!
//! Nothing in the body is trusted until the signature over `respData` has
//! verified. Decryption of `sensData` happens strictly afterwards.

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use entauth_core::sha512_hex;
use entauth_crypto::GatewayCipher;

use crate::error::ExchangeError;
use crate::form;
use crate::types::{GatewayResponse, SensitiveData};

/// A verified, decoded gateway response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedExchange {
    pub response: GatewayResponse,
    /// Decrypted `sensData`, when the gateway returned one.
    pub sensitive: Option<SensitiveData>,
}

pub struct ExchangeResponseProcessor {
    cipher: Arc<dyn GatewayCipher>,
}

impl std::fmt::Debug for ExchangeResponseProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeResponseProcessor")
            .field("cipher", &self.cipher.name())
            .finish()
    }
}

impl ExchangeResponseProcessor {
    pub fn new(cipher: Arc<dyn GatewayCipher>) -> Self {
        Self { cipher }
    }

    pub fn process(&self, body: &str) -> Result<ProcessedExchange, ExchangeError> {
        let fields = form::parse_raw(body);
        let resp_data = fields
            .get("respData")
            .ok_or_else(|| ExchangeError::MalformedResponse("missing respData".into()))?;
        let signature = fields
            .get("signature")
            .ok_or_else(|| ExchangeError::MalformedResponse("missing signature".into()))?;

        let verify_fields = BTreeMap::from([
            ("respData".to_string(), sha512_hex(resp_data)),
            ("signature".to_string(), signature.clone()),
        ]);
        let status = self.cipher.verify(&verify_fields);
        if !status.is_success() {
            tracing::warn!(code = %status.code, "gateway response signature rejected");
            return Err(ExchangeError::SignatureVerificationFailed(status));
        }

        let json = STANDARD
            .decode(resp_data)
            .map_err(|e| ExchangeError::MalformedResponse(format!("respData is not base64: {e}")))?;
        let response: GatewayResponse = serde_json::from_slice(&json).map_err(|e| {
            ExchangeError::MalformedResponse(format!("respData is not a JSON object: {e}"))
        })?;

        let sensitive = match response.sens_data.as_deref() {
            Some(ciphertext) => Some(self.decrypt_sensitive(ciphertext)?),
            None => None,
        };

        Ok(ProcessedExchange {
            response,
            sensitive,
        })
    }

    fn decrypt_sensitive(&self, ciphertext: &str) -> Result<SensitiveData, ExchangeError> {
        let plaintext = self
            .cipher
            .decrypt_field(ciphertext)
            .into_result()
            .map_err(|status| {
                tracing::error!(code = %status.code, "sensitive data decryption failed");
                ExchangeError::DecryptionFailed(status)
            })?;
        serde_json::from_str(&plaintext).map_err(|e| {
            ExchangeError::MalformedResponse(format!("decrypted sensData is not a JSON object: {e}"))
        })
    }
}
