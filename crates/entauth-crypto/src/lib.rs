//! # entauth-crypto: Cryptographic Primitives for entauth
//!
//! - **Bearer tokens**: [`TokenCodec`] issues and validates compact
//!   HMAC-SHA256 signed tokens (`header.payload.signature`, base64url without
//!   padding) carrying caller identity claims.
//! - **Secret handling**: [`SecretKey`] holds the process-wide MAC secret,
//!   loaded once at startup and zeroized on drop.
//! - **Gateway cipher boundary**: [`GatewayCipher`] is the four-operation
//!   capability (encrypt, decrypt, sign, verify) the verification gateway's
//!   proprietary SDK is hidden behind. [`LoopbackCipher`] is a software
//!   implementation for development and tests.

pub mod cipher;
pub mod error;
pub mod key;
pub mod loopback;
pub mod token;

// Re-export primary types.
pub use cipher::{CipherOutcome, CipherStatus, GatewayCipher, CIPHER_SUCCESS_CODE};
pub use error::{CryptoError, TokenError};
pub use key::SecretKey;
pub use loopback::LoopbackCipher;
pub use token::{TokenClaims, TokenCodec, VerifiedToken, EXPIRY_SKEW_MS};
