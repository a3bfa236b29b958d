//! # Bearer Token Codec
//!
//! Compact HMAC-SHA256 tokens of the form `header.payload.signature`, each
//! segment base64url without padding.
//!
//! ## Checks
//!
//! Validation runs in a fixed order and stops at the first failure:
//!
//! 1. shape: exactly three non-empty dot-separated segments
//! 2. signature: constant-time comparison against the recomputed MAC
//! 3. payload: base64url JSON object
//! 4. expiry: `exp * 1000 + EXPIRY_SKEW_MS >= now_ms`
//!
//! A forged token is therefore always reported as [`TokenError::BadSignature`]
//! no matter what its payload claims.

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use entauth_core::identity::{CLAIM_REGION_UID, CLAIM_USER_ID, CLAIM_WORKSPACE_ID};
use entauth_core::{CallerIdentity, CanonicalBytes, Clock};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::TokenError;
use crate::key::SecretKey;

type HmacSha256 = Hmac<Sha256>;

/// Grace period applied after `exp` before a token is rejected.
pub const EXPIRY_SKEW_MS: i64 = 5_000;

const CLAIM_ISSUED_AT: &str = "iat";
const CLAIM_EXPIRES_AT: &str = "exp";
const RESERVED_CLAIMS: [&str; 2] = [CLAIM_ISSUED_AT, CLAIM_EXPIRES_AT];
const BEARER_PREFIX: &str = "Bearer ";
const ALGORITHM: &str = "HS256";

/// Caller-supplied claims. `iat` and `exp` are managed by the codec and may
/// not appear here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenClaims(BTreeMap<String, Value>);

impl TokenClaims {
    /// An empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Insert or replace a claim, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// A claim's value when it is a JSON string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Project the identity claims used for audit logging.
    pub fn caller_identity(&self) -> CallerIdentity {
        CallerIdentity {
            user_id: self.get_str(CLAIM_USER_ID).map(str::to_owned),
            workspace_id: self.get_str(CLAIM_WORKSPACE_ID).map(str::to_owned),
            region_uid: self.get_str(CLAIM_REGION_UID).map(str::to_owned),
        }
    }

    fn reserved_name(&self) -> Option<&'static str> {
        RESERVED_CLAIMS
            .into_iter()
            .find(|name| self.0.contains_key(*name))
    }
}

impl From<BTreeMap<String, Value>> for TokenClaims {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for TokenClaims {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A token that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    /// Claims with `iat` and `exp` removed.
    pub claims: TokenClaims,
    /// The `iat` claim (seconds since epoch), if it was numeric.
    pub issued_at: Option<i64>,
    /// The `exp` claim (seconds since epoch).
    pub expires_at: i64,
    /// The `kid` header value.
    pub key_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kid: Option<String>,
}

/// Issues and validates bearer tokens with a single shared secret.
///
/// Immutable after construction and safe to share across tasks behind an
/// `Arc`.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: SecretKey,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(secret: SecretKey, clock: Arc<dyn Clock>) -> Self {
        Self { secret, clock }
    }

    /// Mint a token carrying `claims` plus `iat = now` and
    /// `exp = now + ttl_seconds`.
    pub fn issue(&self, claims: &TokenClaims, ttl_seconds: i64) -> Result<String, TokenError> {
        if ttl_seconds <= 0 {
            return Err(TokenError::InvalidArgument(
                "ttl_seconds must be positive".into(),
            ));
        }
        if claims.is_empty() {
            return Err(TokenError::InvalidArgument(
                "claims must not be empty".into(),
            ));
        }
        if let Some(name) = claims.reserved_name() {
            return Err(TokenError::InvalidArgument(format!(
                "claim '{name}' is reserved"
            )));
        }

        let issued_at = self.clock.now_secs();
        let expires_at = issued_at
            .checked_add(ttl_seconds)
            .ok_or_else(|| TokenError::InvalidArgument("ttl_seconds overflows".into()))?;

        let header = TokenHeader {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
            kid: Some(Uuid::new_v4().to_string()),
        };
        let mut payload = claims.0.clone();
        payload.insert(CLAIM_ISSUED_AT.to_string(), Value::from(issued_at));
        payload.insert(CLAIM_EXPIRES_AT.to_string(), Value::from(expires_at));

        let header_segment = URL_SAFE_NO_PAD.encode(CanonicalBytes::new(&header)?.as_bytes());
        let payload_segment = URL_SAFE_NO_PAD.encode(CanonicalBytes::new(&payload)?.as_bytes());
        let signing_input = format!("{header_segment}.{payload_segment}");
        let signature = self.mac(&signing_input)?;

        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Validate a token (optionally `"Bearer "`-prefixed) and return its
    /// caller claims.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify(token).map(|verified| verified.claims)
    }

    /// Validate a raw `Authorization` header value.
    pub fn validate_header(&self, header: Option<&str>) -> Result<TokenClaims, TokenError> {
        match header {
            Some(value) => self.validate(value),
            None => Err(TokenError::MalformedToken("missing token".into())),
        }
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    /// Validate a token and return its claims together with the timing and
    /// key-id metadata.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let token = token.strip_prefix(BEARER_PREFIX).unwrap_or(token).trim();

        let mut segments = token.split('.');
        let (header_segment, payload_segment, signature_segment) = match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() && !s.is_empty() => {
                (h, p, s)
            }
            _ => {
                return Err(TokenError::MalformedToken(
                    "expected three non-empty segments".into(),
                ))
            }
        };

        let signing_input = &token[..header_segment.len() + 1 + payload_segment.len()];
        let expected = self.mac(signing_input)?;
        let provided = URL_SAFE_NO_PAD
            .decode(signature_segment)
            .map_err(|_| TokenError::BadSignature)?;
        if !signatures_match(&expected, &provided) {
            tracing::debug!("token signature mismatch");
            return Err(TokenError::BadSignature);
        }

        let header: TokenHeader = decode_segment(header_segment, "header")?;
        if header.alg != ALGORITHM {
            return Err(TokenError::MalformedToken(format!(
                "unsupported alg '{}'",
                header.alg
            )));
        }
        let mut payload: BTreeMap<String, Value> = decode_segment(payload_segment, "payload")?;

        let issued_at = payload.remove(CLAIM_ISSUED_AT).and_then(|v| v.as_i64());
        let expires_at = payload.remove(CLAIM_EXPIRES_AT).and_then(|v| v.as_i64());
        let Some(expires_at) = expires_at else {
            return Err(TokenError::Expired { expires_at: None });
        };
        let deadline_ms = expires_at.saturating_mul(1000).saturating_add(EXPIRY_SKEW_MS);
        if deadline_ms < self.clock.now_millis() {
            tracing::debug!(expires_at, "token expired");
            return Err(TokenError::Expired {
                expires_at: Some(expires_at),
            });
        }

        Ok(VerifiedToken {
            claims: TokenClaims(payload),
            issued_at,
            expires_at,
            key_id: header.kid,
        })
    }

    fn mac(&self, signing_input: &str) -> Result<Vec<u8>, TokenError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| TokenError::Encoding(format!("HMAC key rejected: {e}")))?;
        mac.update(signing_input.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(
    segment: &str,
    what: &str,
) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::MalformedToken(format!("{what} is not base64url")))?;
    serde_json::from_slice(&bytes)
        .map_err(|_| TokenError::MalformedToken(format!("{what} is not a JSON object")))
}

/// Constant-time comparison. A length mismatch still runs a dummy comparison
/// so the failure path does not return early on length alone.
fn signatures_match(expected: &[u8], provided: &[u8]) -> bool {
    if expected.len() != provided.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    expected.ct_eq(provided).into()
}
