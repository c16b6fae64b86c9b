//! Local group domain model.

use serde::{Deserialize, Serialize};

use super::meta::ObjectMeta;

/// A tenant-scoped identity group.
///
/// The membership list lives in `status.users` and is the only part of
/// the object rewritten during admission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalGroup {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: LocalGroupSpec,
    #[serde(default)]
    pub status: LocalGroupStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalGroupSpec {
    /// Owning tenant. Immutable once the group exists.
    #[serde(rename = "tenantID")]
    pub tenant_id: String,
    pub display_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalGroupStatus {
    /// Ordered membership list.
    pub users: Vec<MemberRef>,
}

/// Reference to a group member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub id: String,
    /// Cached username of the member. Empty means unresolved.
    #[serde(default)]
    pub name: String,
}

impl MemberRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// A reference that still has to be resolved against the directory.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self::new(id, "")
    }

    pub fn is_resolved(&self) -> bool {
        !self.name.is_empty()
    }
}

impl LocalGroup {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn tenant_id(&self) -> &str {
        &self.spec.tenant_id
    }

    pub fn members(&self) -> &[MemberRef] {
        &self.status.users
    }
}
