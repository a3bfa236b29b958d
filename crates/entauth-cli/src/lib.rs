//! # entauth-cli: Operator CLI for the Verification Service
//!
//! Provides the `entauth` command-line interface.
//!
//! ## Subcommands
//!
//! - `entauth token issue`: mint a bearer token signed with `JWT_SECRET`.
//! - `entauth token inspect`: validate a token and print its claims.
//!
//! ```bash
//! JWT_SECRET=... entauth token issue --user-id u-1 --region-uid cn-east --ttl 3600
//! JWT_SECRET=... entauth token inspect eyJhbGciOi...
//! ```

pub mod token;
