//! # entauth-gateway: Enterprise Verification Gateway Client
//!
//! Typed access to the external "3060" enterprise verification gateway. One
//! call runs the full secure exchange:
//!
//! 1. **Assemble** the business fields and a fresh order id ([`order`]).
//! 2. **Encrypt** the sensitive sub-mapping through the [`GatewayCipher`].
//! 3. **Sign** the SHA-512 hex digest of the base64 request data
//!    ([`request`]).
//! 4. **Transmit** as a URL-encoded form over HTTPS ([`client`]).
//! 5. **Verify** the response signature, then decode and selectively decrypt
//!    ([`response`]).
//! 6. **Map** the gateway result into an [`EnterpriseAuthOutcome`]
//!    ([`outcome`]).
//!
//! The gateway's wire format has two quirks that are preserved exactly: the
//! digest is computed over the base64 *text* (not the JSON bytes), and the
//! response form is split without percent-decoding.
//!
//! ## Architecture
//!
//! This crate is the only path to the gateway. Key material never passes
//! through it; all cryptography is delegated to the [`GatewayCipher`]
//! supplied at construction.
//!
//! [`GatewayCipher`]: entauth_crypto::GatewayCipher

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod order;
pub mod outcome;
pub mod request;
pub mod response;
pub mod types;

pub use client::EnterpriseAuthClient;
pub use config::{ConfigError, GatewayConfig};
pub use error::ExchangeError;
pub use order::{OrderId, OrderIdGenerator};
pub use outcome::EnterpriseAuthOutcome;
pub use request::{ExchangeRequestBuilder, SignedEnvelope};
pub use response::{ExchangeResponseProcessor, ProcessedExchange};
pub use types::{EnterpriseAuthRequest, GatewayResponse, SensitiveData};

/// Business type code for enterprise verification.
pub const BUSI_TYPE_ENTERPRISE: &str = "3060";

/// Key type code: the `key` field is a unified social credit code.
pub const KEY_TYPE_CREDIT_CODE: &str = "1";

/// Gateway `respCode` for a completed verification.
pub const RESP_CODE_SUCCESS: &str = "00000000";

/// Gateway `orderStatus` for a charged order.
pub const ORDER_STATUS_CHARGED: &str = "0000";
