//! # Gateway Cipher Capability
//!
//! The verification gateway requires field-level encryption and request
//! signatures produced by a proprietary SDK. Everything that SDK does is
//! reached through [`GatewayCipher`]; the rest of the service never touches
//! key material or SDK configuration.
//!
//! Operations report a status code rather than a Rust error, matching the
//! SDK's contract. `"00"` is success; any other code is a failure with a
//! human-readable message. Callers convert non-success statuses into their
//! own typed errors.

use std::collections::BTreeMap;

/// Status code signalling success.
pub const CIPHER_SUCCESS_CODE: &str = "00";

/// Result status of a cipher operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherStatus {
    pub code: String,
    pub message: String,
}

impl CipherStatus {
    pub fn success() -> Self {
        Self {
            code: CIPHER_SUCCESS_CODE.to_string(),
            message: "success".to_string(),
        }
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CIPHER_SUCCESS_CODE
    }
}

impl std::fmt::Display for CipherStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Status plus the produced value (ciphertext, plaintext, or signature).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherOutcome {
    pub status: CipherStatus,
    pub value: Option<String>,
}

impl CipherOutcome {
    pub fn ok(value: impl Into<String>) -> Self {
        Self {
            status: CipherStatus::success(),
            value: Some(value.into()),
        }
    }

    pub fn failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: CipherStatus::failure(code, message),
            value: None,
        }
    }

    /// The produced value, or the failing status. A success status without a
    /// value is treated as a failure.
    pub fn into_result(self) -> Result<String, CipherStatus> {
        match (self.status.is_success(), self.value) {
            (true, Some(value)) => Ok(value),
            (true, None) => Err(CipherStatus::failure(
                "99",
                "cipher reported success without a value",
            )),
            (false, _) => Err(self.status),
        }
    }
}

/// Field-level cryptography required by the verification gateway.
///
/// Implementations must be thread-safe: a single instance is shared by every
/// in-flight exchange.
pub trait GatewayCipher: Send + Sync {
    /// Encrypt sensitive field text.
    fn encrypt_field(&self, plaintext: &str) -> CipherOutcome;

    /// Decrypt text produced by the gateway's `encrypt_field` counterpart.
    fn decrypt_field(&self, ciphertext: &str) -> CipherOutcome;

    /// Sign a field map. The signature is returned as the outcome value.
    fn sign(&self, fields: &BTreeMap<String, String>) -> CipherOutcome;

    /// Verify a field map that includes a `signature` entry.
    fn verify(&self, fields: &BTreeMap<String, String>) -> CipherStatus;

    /// Short identifier for log lines.
    fn name(&self) -> &str;
}
