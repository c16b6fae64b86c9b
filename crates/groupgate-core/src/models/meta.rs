//! Generic object metadata.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata carried by every stored object.
///
/// Only `name`, `generate_name` and the update-consistency fields are
/// interpreted by the validator; the rest is passed through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    /// Prefix used by the store to generate a unique name when `name`
    /// is empty.
    pub generate_name: String,
    /// Always empty for cluster-scoped objects such as groups.
    pub namespace: String,
    pub uid: String,
    /// Opaque store version; ordering is owned by the object store.
    pub resource_version: String,
    pub generation: i64,
    pub creation_timestamp: Option<DateTime<Utc>>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
