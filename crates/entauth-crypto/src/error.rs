//! # Cryptographic Error Types
//!
//! Structured errors for token and key operations in `entauth-crypto`.

use thiserror::Error;

/// Bearer token failures.
///
/// The first three variants are caller-facing authentication failures; the
/// API layer maps all of them to 401.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not three non-empty base64url segments, or a segment does
    /// not decode to the expected JSON shape.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The signature segment does not match the recomputed MAC.
    #[error("token signature mismatch")]
    BadSignature,

    /// The token's `exp` claim is missing or lies beyond the skew buffer.
    #[error("token expired")]
    Expired {
        /// The `exp` claim, if present.
        expires_at: Option<i64>,
    },

    /// Issuance input was rejected (non-positive TTL, empty or reserved claims).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Header or payload could not be serialized, or the MAC key was rejected.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl From<entauth_core::CanonicalizationError> for TokenError {
    fn from(err: entauth_core::CanonicalizationError) -> Self {
        Self::Encoding(err.to_string())
    }
}

/// Errors from key material handling.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The named environment variable is unset or blank.
    #[error("secret {0} is not configured")]
    MissingSecret(String),

    /// Secret material was empty after trimming.
    #[error("secret must not be empty")]
    EmptySecret,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_carries_reason() {
        let err = TokenError::MalformedToken("expected 3 segments".into());
        assert!(err.to_string().contains("expected 3 segments"));
    }

    #[test]
    fn expired_display() {
        let err = TokenError::Expired {
            expires_at: Some(1_700_000_000),
        };
        assert_eq!(err.to_string(), "token expired");
    }

    #[test]
    fn missing_secret_names_variable() {
        let err = CryptoError::MissingSecret("JWT_SECRET".into());
        assert!(err.to_string().contains("JWT_SECRET"));
    }
}
