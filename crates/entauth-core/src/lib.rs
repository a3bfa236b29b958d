#![deny(missing_docs)]

//! # entauth-core: Foundational Types for entauth
//!
//! This crate defines the types every other crate in the workspace builds on.
//! It has no internal crate dependencies.
//!
//! ## Design Principles
//!
//! 1. **[`CanonicalBytes`] is the sole path to signed JSON.** Token headers,
//!    token payloads, the gateway request body and the sensitive block are all
//!    serialized through `CanonicalBytes::new()`: sorted keys, compact
//!    separators. Two runs over the same fields produce the same bytes.
//!
//! 2. **Time is injected.** Anything that reads "now" takes a [`Clock`], so
//!    expiry and order-date logic is testable without sleeping.
//!
//! 3. **State is owned, not global.** [`DirectoryCache`] is constructed at
//!    startup and shared by `Arc`; there is no lazy static initialization.

pub mod canonical;
pub mod digest;
pub mod directory;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::sha512_hex;
pub use directory::{DirectoryCache, DirectoryError, DirectorySnapshot};
pub use error::{CanonicalizationError, ValidationError};
pub use identity::CallerIdentity;
pub use temporal::{Clock, ManualClock, SystemClock};
