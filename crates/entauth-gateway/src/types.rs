//! Request and response types for the verification exchange.
//!
//! Field names follow the gateway's camelCase wire names. Response types
//! use `#[serde(default)]` throughout and tolerate unknown fields, since the
//! gateway may add fields without notice.

use entauth_core::ValidationError;
use serde::{Deserialize, Serialize};

/// A caller's enterprise verification request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseAuthRequest {
    /// Unified social credit code of the enterprise.
    #[serde(default)]
    pub key: String,
    /// Bank holding the enterprise account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_bank: Option<String>,
    /// Province of the account bank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_prov: Option<String>,
    /// City of the account bank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_city: Option<String>,
    /// 12-character interbank branch number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_bank: Option<String>,
    /// Registered enterprise name.
    #[serde(default)]
    pub key_name: String,
    /// Legal representative's name.
    #[serde(default)]
    pub usr_name: String,
    /// Enterprise account number.
    #[serde(default)]
    pub account_no: String,
}

impl EnterpriseAuthRequest {
    /// Check field presence and lengths. Reports the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_len("key", &self.key, 5, 20)?;
        if let Some(sub_bank) = &self.sub_bank {
            check_len("subBank", sub_bank, 12, 12)?;
        }
        require_non_blank("keyName", &self.key_name)?;
        require_non_blank("usrName", &self.usr_name)?;
        require_len("accountNo", &self.account_no, 1, 32)?;
        Ok(())
    }

    /// The sensitive sub-mapping that is encrypted before transmission.
    pub fn sensitive_data(&self) -> SensitiveData {
        SensitiveData {
            account_no: Some(self.account_no.clone()),
            key_name: Some(self.key_name.clone()),
            usr_name: Some(self.usr_name.clone()),
        }
    }
}

fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

fn require_len(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    require_non_blank(field, value)?;
    check_len(field, value, min, max)
}

fn check_len(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::Length {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

/// The sensitive sub-mapping, in both directions.
///
/// Never logged. Outbound it is serialized to canonical JSON and encrypted;
/// inbound it is the decrypted `sensData` of a verified response.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitiveData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usr_name: Option<String>,
}

impl std::fmt::Debug for SensitiveData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensitiveData")
            .field("account_no", &self.account_no.as_ref().map(|_| "[REDACTED]"))
            .field("key_name", &self.key_name.as_ref().map(|_| "[REDACTED]"))
            .field("usr_name", &self.usr_name.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Business fields sent to the gateway, base64-encoded as `reqData`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExchangeRequest<'a> {
    pub mer_no: &'a str,
    pub busi_type: &'a str,
    pub key_type: &'a str,
    pub order_date: &'a str,
    pub order_id: &'a str,
    pub key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_bank: Option<&'a str>,
    pub sens_data: &'a str,
}

/// Decoded `respData` of a gateway response.
///
/// `sens_data` holds the still-encrypted sensitive mapping exactly as
/// received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayResponse {
    pub resp_code: Option<String>,
    pub resp_msg: Option<String>,
    pub order_id: Option<String>,
    pub order_status: Option<String>,
    pub mer_no: Option<String>,
    pub busi_type: Option<String>,
    pub key_type: Option<String>,
    pub order_date: Option<String>,
    pub key: Option<String>,
    pub account_bank: Option<String>,
    pub account_prov: Option<String>,
    pub account_city: Option<String>,
    pub sub_bank: Option<String>,
    pub trans_amt: Option<String>,
    pub random_num: Option<String>,
    pub sens_data: Option<String>,
}
