//! Membership reconciliation against the identity directory.
//!
//! Walks `status.users` once, in order, and builds a candidate member
//! list in a separate buffer. The caller decides whether to commit it.

use groupgate_core::error::GateError;
use groupgate_core::field::{ErrorList, FieldError, FieldPath};
use groupgate_core::models::group::{LocalGroup, MemberRef};
use groupgate_core::repository::IdentityRepository;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::observer::PruneObserver;

/// Candidate membership produced by one reconciliation pass.
#[derive(Debug, Default)]
pub(crate) struct Reconciled {
    /// Members to keep, in input order, with names filled in.
    pub retained: Vec<MemberRef>,
    /// Members dropped because their identity no longer exists.
    pub pruned: Vec<MemberRef>,
}

pub(crate) async fn reconcile_members<R: IdentityRepository>(
    cancel: &CancellationToken,
    group: &LocalGroup,
    identities: &R,
    observer: &dyn PruneObserver,
    errs: &mut ErrorList,
) -> Reconciled {
    let path = FieldPath::from_segments(&["status", "users"]);
    let mut out = Reconciled::default();

    for member in group.members() {
        if member.id.is_empty() {
            errs.push(FieldError::required(path.clone(), "must specify id"));
            continue;
        }

        if member.is_resolved() {
            out.retained.push(member.clone());
            continue;
        }

        // Cancellation wins over a lookup that is ready at the same time.
        let lookup = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GateError::Cancelled),
            res = identities.get_by_id(&member.id) => res,
        };

        match lookup {
            Ok(identity) if identity.tenant_id != group.tenant_id() => {
                errs.push(FieldError::invalid(
                    path.clone(),
                    &member.id,
                    "must be in the same tenant as the group",
                ));
            }
            Ok(identity) => {
                debug!(
                    group = %group.name(),
                    user = %member.id,
                    username = %identity.username,
                    "Resolved group member"
                );
                out.retained
                    .push(MemberRef::new(member.id.clone(), identity.username));
            }
            Err(err) if err.is_not_found() => {
                observer.member_pruned(group.name(), &member.id);
                out.pruned.push(member.clone());
            }
            Err(GateError::Cancelled) => {
                warn!(
                    group = %group.name(),
                    user = %member.id,
                    "Validation cancelled during member lookup"
                );
                errs.push(FieldError::internal(path.clone(), &GateError::Cancelled));
                break;
            }
            Err(err) => {
                errs.push(FieldError::internal(path.clone(), &err));
            }
        }
    }

    out
}
