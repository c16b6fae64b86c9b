//! SurrealDB implementation of [`IdentityRepository`].

use groupgate_core::error::GateResult;
use groupgate_core::models::identity::LocalIdentity;
use groupgate_core::repository::IdentityRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

/// DB-side row struct; the id is the record key and already known.
#[derive(Debug, SurrealValue)]
struct IdentityRow {
    tenant_id: String,
    username: String,
}

impl IdentityRow {
    fn into_identity(self, id: &str) -> LocalIdentity {
        LocalIdentity {
            id: id.to_string(),
            tenant_id: self.tenant_id,
            username: self.username,
        }
    }
}

/// Read-only view of the `identity` table.
#[derive(Clone)]
pub struct SurrealIdentityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealIdentityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> IdentityRepository for SurrealIdentityRepository<C> {
    async fn get_by_id(&self, id: &str) -> GateResult<LocalIdentity> {
        let mut result = self
            .db
            .query("SELECT tenant_id, username FROM type::record('identity', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IdentityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "identity".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_identity(id))
    }
}
