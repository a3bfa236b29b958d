//! # Secret Key
//!
//! The shared MAC secret for bearer tokens. Loaded once during startup and
//! handed to [`TokenCodec`](crate::TokenCodec) by value; there is no global
//! key and no lazy initialization.
//!
//! A missing or blank secret is a fatal startup error, never a per-request
//! error.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Raw secret bytes, zeroized on drop.
///
/// Custom `Debug` redacts the value to prevent credential leakage in logs.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Wrap secret text. Surrounding whitespace is trimmed; an empty result
    /// is rejected.
    pub fn new(secret: &str) -> Result<Self, CryptoError> {
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            return Err(CryptoError::EmptySecret);
        }
        Ok(Self(trimmed.as_bytes().to_vec()))
    }

    /// Load the secret from the named environment variable.
    ///
    /// ```bash
    /// export JWT_SECRET="..."
    /// ```
    pub fn from_env(var_name: &str) -> Result<Self, CryptoError> {
        let raw = std::env::var(var_name)
            .map_err(|_| CryptoError::MissingSecret(var_name.to_string()))?;
        Self::new(&raw).map_err(|_| CryptoError::MissingSecret(var_name.to_string()))
    }

    /// The secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}
