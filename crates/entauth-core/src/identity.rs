//! # Caller Identity
//!
//! The identity attributes carried by a verified bearer token. The auth
//! middleware builds a [`CallerIdentity`] from the token claims and the
//! gateway client logs it alongside each order id.

use serde::{Deserialize, Serialize};

/// Claim name for the user identifier.
pub const CLAIM_USER_ID: &str = "userId";
/// Claim name for the workspace identifier.
pub const CLAIM_WORKSPACE_ID: &str = "workspaceId";
/// Claim name for the region identifier.
pub const CLAIM_REGION_UID: &str = "regionUid";

/// Identity of an authenticated caller.
///
/// Every field is optional on the wire: tokens minted by older issuers may
/// omit some claims, and the service only needs them for audit logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerIdentity {
    /// The caller's user id (`userId` claim).
    pub user_id: Option<String>,
    /// The caller's workspace (`workspaceId` claim).
    pub workspace_id: Option<String>,
    /// The caller's region (`regionUid` claim).
    pub region_uid: Option<String>,
}

impl CallerIdentity {
    /// User id for log lines, `"unknown"` when absent.
    pub fn user_id_or_unknown(&self) -> &str {
        self.user_id.as_deref().unwrap_or("unknown")
    }

    /// Region uid for log lines, `"unknown"` when absent.
    pub fn region_uid_or_unknown(&self) -> &str {
        self.region_uid.as_deref().unwrap_or("unknown")
    }
}
