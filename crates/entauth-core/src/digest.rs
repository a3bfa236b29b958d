//! # Transport Digests
//!
//! The verification gateway signs and verifies a lowercase hex SHA-512 digest
//! of the *base64 text* of a payload, not of the decoded payload bytes. The
//! helper here takes `&str` so call sites hash exactly the string that goes on
//! the wire.

use sha2::{Digest, Sha512};

/// Lowercase hex SHA-512 over the UTF-8 bytes of `text` (128 hex chars).
pub fn sha512_hex(text: &str) -> String {
    hex::encode(Sha512::digest(text.as_bytes()))
}
