//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations report a
//! missing record as [`GateError::NotFound`](crate::error::GateError)
//! so callers can tell it apart from backend failures.

use crate::error::GateResult;
use crate::models::identity::LocalIdentity;

// ---------------------------------------------------------------------------
// Identity directory (read-only)
// ---------------------------------------------------------------------------

pub trait IdentityRepository: Send + Sync {
    fn get_by_id(&self, id: &str) -> impl Future<Output = GateResult<LocalIdentity>> + Send;
}

impl<R: IdentityRepository> IdentityRepository for &R {
    fn get_by_id(&self, id: &str) -> impl Future<Output = GateResult<LocalIdentity>> + Send {
        (**self).get_by_id(id)
    }
}

impl<R: IdentityRepository> IdentityRepository for std::sync::Arc<R> {
    fn get_by_id(&self, id: &str) -> impl Future<Output = GateResult<LocalIdentity>> + Send {
        (**self).get_by_id(id)
    }
}
