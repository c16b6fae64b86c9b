//! Identity domain model.

use serde::{Deserialize, Serialize};

/// Canonical record for a principal, owned by the identity directory.
///
/// Groupgate never writes identities; it only looks them up by `id`
/// while reconciling group membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentity {
    pub id: String,
    #[serde(rename = "tenantID")]
    pub tenant_id: String,
    pub username: String,
}
