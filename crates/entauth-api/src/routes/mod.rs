//! # API Route Modules
//!
//! - `enterprise_auth`: enterprise verification through the 3060 gateway.
//! - `banks`: bank code → bank name directory.

pub mod banks;
pub mod enterprise_auth;
