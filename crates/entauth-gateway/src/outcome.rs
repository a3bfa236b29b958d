//! Mapping a verified gateway response into the caller-facing result.

use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;
use crate::response::ProcessedExchange;
use crate::types::EnterpriseAuthRequest;
use crate::{ORDER_STATUS_CHARGED, RESP_CODE_SUCCESS};

/// Result of an enterprise verification.
///
/// A gateway business failure (any `respCode` other than `00000000`) is
/// still an `Ok` outcome with `is_transaction_success == false`; only
/// protocol and transport failures are errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseAuthOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_msg: Option<String>,
    pub is_transaction_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_bank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_prov: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_bank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enterprise_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_person_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub is_charged: bool,
    /// Amount charged; reported on success only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_amt: Option<String>,
}

impl EnterpriseAuthOutcome {
    /// Build the outcome for `request` from its processed exchange.
    ///
    /// On success the identity fields come from the gateway (names from the
    /// decrypted `sensData`); on business failure the caller's submitted
    /// fields are echoed back.
    pub fn from_exchange(
        request: &EnterpriseAuthRequest,
        exchange: &ProcessedExchange,
    ) -> Result<Self, ExchangeError> {
        let response = &exchange.response;
        let is_charged = response.order_status.as_deref() == Some(ORDER_STATUS_CHARGED);

        if response.resp_code.as_deref() == Some(RESP_CODE_SUCCESS) {
            let sensitive = exchange.sensitive.as_ref().ok_or_else(|| {
                ExchangeError::MalformedResponse("successful response without sensData".into())
            })?;
            return Ok(Self {
                resp_code: response.resp_code.clone(),
                resp_msg: response.resp_msg.clone(),
                is_transaction_success: true,
                key: response.key.clone(),
                account_bank: response.account_bank.clone(),
                account_prov: response.account_prov.clone(),
                account_city: response.account_city.clone(),
                sub_bank: response.sub_bank.clone(),
                enterprise_name: sensitive.key_name.clone(),
                legal_person_name: sensitive.usr_name.clone(),
                order_id: response.order_id.clone(),
                is_charged,
                trans_amt: response.trans_amt.clone(),
            });
        }

        Ok(Self {
            resp_code: response.resp_code.clone(),
            resp_msg: response.resp_msg.clone(),
            is_transaction_success: false,
            key: Some(request.key.clone()),
            account_bank: request.account_bank.clone(),
            account_prov: request.account_prov.clone(),
            account_city: request.account_city.clone(),
            sub_bank: request.sub_bank.clone(),
            enterprise_name: Some(request.key_name.clone()),
            legal_person_name: Some(request.usr_name.clone()),
            order_id: response.order_id.clone(),
            is_charged,
            trans_amt: None,
        })
    }
}
