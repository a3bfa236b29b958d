//! # Loopback Cipher
//!
//! A software [`GatewayCipher`] for development and tests. Field
//! "encryption" is standard base64 and signatures are HMAC-SHA256 over the
//! sorted `key=value` pairs joined with `&`, excluding `signature` itself.
//!
//! It provides no confidentiality and must never face a real gateway. Two
//! instances built with the same key interoperate, so a test can play the
//! gateway side of an exchange with one and the service side with the other.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::cipher::{CipherOutcome, CipherStatus, GatewayCipher};
use crate::key::SecretKey;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_FIELD: &str = "signature";

/// Code returned for undecodable ciphertext.
pub const CODE_DECRYPT_FAILED: &str = "11";
/// Code returned when a signature is missing or wrong.
pub const CODE_VERIFY_FAILED: &str = "21";
/// Code returned when the key is unusable.
pub const CODE_KEY_REJECTED: &str = "31";

#[derive(Debug, Clone)]
pub struct LoopbackCipher {
    key: SecretKey,
}

impl LoopbackCipher {
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }

    fn mac(&self, fields: &BTreeMap<String, String>) -> Result<Vec<u8>, CipherStatus> {
        let mut mac = HmacSha256::new_from_slice(self.key.as_bytes())
            .map_err(|e| CipherStatus::failure(CODE_KEY_REJECTED, e.to_string()))?;
        let mut first = true;
        for (name, value) in fields.iter().filter(|(name, _)| *name != SIGNATURE_FIELD) {
            if !first {
                mac.update(b"&");
            }
            first = false;
            mac.update(name.as_bytes());
            mac.update(b"=");
            mac.update(value.as_bytes());
        }
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl GatewayCipher for LoopbackCipher {
    fn encrypt_field(&self, plaintext: &str) -> CipherOutcome {
        CipherOutcome::ok(STANDARD.encode(plaintext))
    }

    fn decrypt_field(&self, ciphertext: &str) -> CipherOutcome {
        let decoded = match STANDARD.decode(ciphertext) {
            Ok(bytes) => bytes,
            Err(e) => return CipherOutcome::failed(CODE_DECRYPT_FAILED, e.to_string()),
        };
        match String::from_utf8(decoded) {
            Ok(text) => CipherOutcome::ok(text),
            Err(_) => CipherOutcome::failed(CODE_DECRYPT_FAILED, "plaintext is not UTF-8"),
        }
    }

    fn sign(&self, fields: &BTreeMap<String, String>) -> CipherOutcome {
        match self.mac(fields) {
            Ok(tag) => CipherOutcome::ok(STANDARD.encode(tag)),
            Err(status) => CipherOutcome {
                status,
                value: None,
            },
        }
    }

    fn verify(&self, fields: &BTreeMap<String, String>) -> CipherStatus {
        let Some(signature) = fields.get(SIGNATURE_FIELD) else {
            return CipherStatus::failure(CODE_VERIFY_FAILED, "signature field missing");
        };
        let Ok(provided) = STANDARD.decode(signature) else {
            return CipherStatus::failure(CODE_VERIFY_FAILED, "signature is not base64");
        };
        let expected = match self.mac(fields) {
            Ok(tag) => tag,
            Err(status) => return status,
        };
        if expected.len() == provided.len() && bool::from(expected.ct_eq(&provided)) {
            CipherStatus::success()
        } else {
            CipherStatus::failure(CODE_VERIFY_FAILED, "signature mismatch")
        }
    }

    fn name(&self) -> &str {
        "loopback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher(key: &str) -> LoopbackCipher {
        LoopbackCipher::new(SecretKey::new(key).unwrap())
    }

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let c = cipher("k");
        let ct = c.encrypt_field(r#"{"accountNo":"6222"}"#).into_result().unwrap();
        let pt = c.decrypt_field(&ct).into_result().unwrap();
        assert_eq!(pt, r#"{"accountNo":"6222"}"#);
    }

    #[test]
    fn decrypt_rejects_garbage() {
        let status = cipher("k").decrypt_field("%%%").status;
        assert_eq!(status.code, CODE_DECRYPT_FAILED);
    }

    #[test]
    fn sign_then_verify() {
        let c = cipher("k");
        let mut f = fields(&[("respData", "ab12")]);
        let sig = c.sign(&f).into_result().unwrap();
        f.insert("signature".into(), sig);
        assert!(c.verify(&f).is_success());
    }

    #[test]
    fn peers_with_same_key_interoperate() {
        let gateway = cipher("shared");
        let service = cipher("shared");
        let mut f = fields(&[("reqData", "ff00")]);
        f.insert("signature".into(), gateway.sign(&f).into_result().unwrap());
        assert!(service.verify(&f).is_success());
    }

    #[test]
    fn verify_rejects_wrong_key_and_tampering() {
        let signer = cipher("a");
        let mut f = fields(&[("respData", "ab12")]);
        f.insert("signature".into(), signer.sign(&f).into_result().unwrap());

        assert_eq!(cipher("b").verify(&f).code, CODE_VERIFY_FAILED);

        f.insert("respData".into(), "ab13".into());
        assert_eq!(signer.verify(&f).code, CODE_VERIFY_FAILED);
    }

    #[test]
    fn verify_requires_signature_field() {
        let status = cipher("k").verify(&fields(&[("respData", "ab12")]));
        assert_eq!(status.code, CODE_VERIFY_FAILED);
    }
}
