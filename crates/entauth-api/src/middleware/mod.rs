//! # Middleware
//!
//! - `tracing_layer`: `tower_http` request/response trace spans.
//! - `request_context`: per-request span carrying the caller's identity, so
//!   every log line emitted while handling a request names who made it.
//! - `error_disclosure`: development-only rewrite of error bodies to include
//!   the internal error text.

pub mod error_disclosure;
pub mod request_context;
pub mod tracing_layer;
