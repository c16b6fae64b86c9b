//! Local group validator: create and update admission checks.

use std::sync::Arc;

use groupgate_core::error::GateResult;
use groupgate_core::field::{ErrorList, FieldError, FieldPath};
use groupgate_core::models::group::{LocalGroup, MemberRef};
use groupgate_core::repository::IdentityRepository;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::membership::{Reconciled, reconcile_members};
use crate::meta::{validate_object_meta, validate_object_meta_update};
use crate::names;
use crate::observer::{PruneObserver, TracingPruneObserver};

/// Outcome of validating one group.
#[derive(Debug, Clone)]
pub struct GroupValidation {
    /// The normalized group. Its members are the reconciled list when
    /// `errors` is empty, and the input list verbatim otherwise.
    pub group: LocalGroup,
    /// Every problem found, in check order.
    pub errors: ErrorList,
    /// Members removed because their identity no longer exists. Empty
    /// unless the reconciled list was committed.
    pub pruned: Vec<MemberRef>,
}

impl GroupValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the normalized group, or a validation error listing every
    /// field error.
    pub fn into_result(self) -> GateResult<LocalGroup> {
        self.errors.into_result()?;
        Ok(self.group)
    }
}

/// Validates local groups before admission.
///
/// Generic over the identity repository so that validation has no
/// dependency on how identities are stored.
pub struct GroupValidator<R: IdentityRepository> {
    identities: R,
    observer: Arc<dyn PruneObserver>,
    config: ValidationConfig,
}

impl<R: IdentityRepository> GroupValidator<R> {
    pub fn new(identities: R, config: ValidationConfig) -> Self {
        Self {
            identities,
            observer: Arc::new(TracingPruneObserver),
            config,
        }
    }

    /// Replaces the default tracing observer for pruned members.
    pub fn with_observer(mut self, observer: Arc<dyn PruneObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Validate a group on create.
    ///
    /// Checks metadata and display name, then reconciles the member
    /// list against the identity directory. Unresolved members get
    /// their username filled in; members whose identity no longer
    /// exists are dropped. The reconciled list is only committed when
    /// no error at all was found.
    ///
    /// `cancel` is only consulted around directory lookups. A group
    /// whose members are all resolved performs no lookup and is not
    /// affected by a cancelled token.
    pub async fn validate(&self, cancel: &CancellationToken, group: &LocalGroup) -> GroupValidation {
        let mut errors = ErrorList::new();
        let reconciled = self.check(cancel, group, &mut errors).await;
        let (group, pruned) = commit(group, &errors, reconciled);
        GroupValidation {
            group,
            errors,
            pruned,
        }
    }

    /// Validate a group on update.
    ///
    /// Runs the metadata update checks, the full create validation on
    /// `group`, and rejects any change of the owning tenant, reporting
    /// errors in that order. Whether the reconciled members are
    /// committed depends on the create validation alone.
    pub async fn validate_update(
        &self,
        cancel: &CancellationToken,
        group: &LocalGroup,
        old: &LocalGroup,
    ) -> GroupValidation {
        let mut errors =
            validate_object_meta_update(&group.metadata, &old.metadata, &FieldPath::new("metadata"));

        let mut checked = ErrorList::new();
        let reconciled = self.check(cancel, group, &mut checked).await;
        let (normalized, pruned) = commit(group, &checked, reconciled);
        errors.extend(checked);

        if group.tenant_id() != old.tenant_id() {
            errors.push(FieldError::invalid(
                FieldPath::new("spec").child("tenantID"),
                group.tenant_id(),
                "disallowed: change the tenant",
            ));
        }

        GroupValidation {
            group: normalized,
            errors,
            pruned,
        }
    }

    async fn check(
        &self,
        cancel: &CancellationToken,
        group: &LocalGroup,
        errs: &mut ErrorList,
    ) -> Reconciled {
        errs.extend(validate_object_meta(
            &group.metadata,
            &self.config,
            &FieldPath::new("metadata"),
        ));

        if let Some(msg) =
            names::display_name(&group.spec.display_name, self.config.display_name_max_length)
        {
            errs.push(FieldError::invalid(
                FieldPath::new("spec").child("displayName"),
                &group.spec.display_name,
                msg,
            ));
        }

        reconcile_members(cancel, group, &self.identities, self.observer.as_ref(), errs).await
    }
}

/// Publishes the reconciled members only if `errors` is empty.
fn commit(
    group: &LocalGroup,
    errors: &ErrorList,
    reconciled: Reconciled,
) -> (LocalGroup, Vec<MemberRef>) {
    let mut group = group.clone();

    if !errors.is_empty() {
        debug!(
            group = %group.name(),
            errors = errors.len(),
            "Group rejected, membership left unchanged"
        );
        return (group, Vec::new());
    }

    group.status.users = reconciled.retained;
    (group, reconciled.pruned)
}

/// Validate a group on create with the default configuration.
pub async fn validate_local_group<R: IdentityRepository>(
    cancel: &CancellationToken,
    group: &LocalGroup,
    identities: R,
) -> GroupValidation {
    GroupValidator::new(identities, ValidationConfig::default())
        .validate(cancel, group)
        .await
}

/// Validate a group on update with the default configuration.
pub async fn validate_local_group_update<R: IdentityRepository>(
    cancel: &CancellationToken,
    group: &LocalGroup,
    old: &LocalGroup,
    identities: R,
) -> GroupValidation {
    GroupValidator::new(identities, ValidationConfig::default())
        .validate_update(cancel, group, old)
        .await
}
