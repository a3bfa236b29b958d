//! Outbound request assembly: encrypt, encode, digest, sign.

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use entauth_core::{sha512_hex, CanonicalBytes, Clock};
use entauth_crypto::GatewayCipher;

use crate::error::ExchangeError;
use crate::form;
use crate::order::OrderIdGenerator;
use crate::types::{EnterpriseAuthRequest, ExchangeRequest};
use crate::{BUSI_TYPE_ENTERPRISE, KEY_TYPE_CREDIT_CODE};

/// A signed request ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    /// Order id embedded in `req_data`, kept for logging and correlation.
    pub order_id: String,
    /// Standard base64 of the canonical request JSON.
    pub req_data: String,
    pub mer_no: String,
    /// Cipher signature over `hex(SHA-512(req_data))`.
    pub signature: String,
}

impl SignedEnvelope {
    /// Form body with fields in the order `reqData`, `merNo`, `signature`.
    pub fn to_form(&self) -> String {
        form::encode(&[
            ("reqData", self.req_data.as_str()),
            ("merNo", self.mer_no.as_str()),
            ("signature", self.signature.as_str()),
        ])
    }
}

/// Builds [`SignedEnvelope`]s for one merchant.
pub struct ExchangeRequestBuilder {
    cipher: Arc<dyn GatewayCipher>,
    merchant_no: String,
    orders: OrderIdGenerator,
}

impl std::fmt::Debug for ExchangeRequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRequestBuilder")
            .field("cipher", &self.cipher.name())
            .field("merchant_no", &self.merchant_no)
            .finish_non_exhaustive()
    }
}

impl ExchangeRequestBuilder {
    pub fn new(
        cipher: Arc<dyn GatewayCipher>,
        merchant_no: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cipher,
            merchant_no: merchant_no.into(),
            orders: OrderIdGenerator::new(clock),
        }
    }

    /// Assemble, encrypt, and sign a request.
    ///
    /// The caller's identity fields are carried only inside the encrypted
    /// `sensData`; `accountProv`, `accountCity`, and `subBank` are not sent.
    pub fn build(&self, request: &EnterpriseAuthRequest) -> Result<SignedEnvelope, ExchangeError> {
        let order = self.orders.next();

        let sensitive = CanonicalBytes::new(&request.sensitive_data())?;
        let sens_data = self
            .cipher
            .encrypt_field(sensitive.as_str())
            .into_result()
            .map_err(ExchangeError::EncryptionFailed)?;

        let business = ExchangeRequest {
            mer_no: &self.merchant_no,
            busi_type: BUSI_TYPE_ENTERPRISE,
            key_type: KEY_TYPE_CREDIT_CODE,
            order_date: &order.order_date,
            order_id: &order.order_id,
            key: &request.key,
            account_bank: request.account_bank.as_deref(),
            sens_data: &sens_data,
        };
        let req_data = STANDARD.encode(CanonicalBytes::new(&business)?.as_bytes());

        // The digest covers the base64 text, not the JSON bytes.
        let digest = sha512_hex(&req_data);
        let sign_fields = BTreeMap::from([("reqData".to_string(), digest)]);
        let signature = self
            .cipher
            .sign(&sign_fields)
            .into_result()
            .map_err(ExchangeError::SigningFailed)?;

        Ok(SignedEnvelope {
            order_id: order.order_id,
            req_data,
            mer_no: self.merchant_no.clone(),
            signature,
        })
    }
}
