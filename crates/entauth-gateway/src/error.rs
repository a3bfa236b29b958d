//! Exchange error types.
//!
//! Every failure of the secure exchange is fatal to the request: nothing is
//! retried and no partial result is returned.

use entauth_core::{CanonicalizationError, ValidationError};
use entauth_crypto::CipherStatus;

/// Errors from a gateway exchange.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The caller's request failed field validation.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// The cipher refused to encrypt the sensitive sub-mapping.
    #[error("sensitive data encryption failed: {0}")]
    EncryptionFailed(CipherStatus),

    /// The cipher refused to sign the request digest.
    #[error("request signing failed: {0}")]
    SigningFailed(CipherStatus),

    /// The response signature did not verify.
    #[error("response signature verification failed: {0}")]
    SignatureVerificationFailed(CipherStatus),

    /// The response's sensitive data could not be decrypted.
    #[error("sensitive data decryption failed: {0}")]
    DecryptionFailed(CipherStatus),

    /// The gateway answered with a status other than 200.
    #[error("gateway returned HTTP {status}: {body}")]
    GatewayHttpError { status: u16, body: String },

    /// Connection, TLS, or timeout failure.
    #[error("gateway transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body, or a decoded part of it, had the wrong shape.
    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),

    /// Request JSON could not be produced.
    #[error("request serialization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

impl ExchangeError {
    /// Whether the failure originates from the caller's input rather than
    /// the gateway or this service.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}
