//! Side-channel notification for pruned members.

use tracing::warn;

/// Receives a notification whenever a member is dropped because its
/// identity no longer exists.
///
/// Notifications are fire-and-forget: the method cannot fail and has no
/// influence on the validation outcome.
pub trait PruneObserver: Send + Sync {
    fn member_pruned(&self, group: &str, member_id: &str);
}

/// Default observer: emits a structured warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPruneObserver;

impl PruneObserver for TracingPruneObserver {
    fn member_pruned(&self, group: &str, member_id: &str) {
        warn!(
            group = %group,
            user = %member_id,
            "User of the group not found, removing it"
        );
    }
}
