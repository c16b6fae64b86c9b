//! Integration tests for the local group validator using an in-memory
//! identity directory.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use groupgate_core::error::{GateError, GateResult};
use groupgate_core::field::FieldErrorKind;
use groupgate_core::models::group::{LocalGroup, LocalGroupSpec, LocalGroupStatus, MemberRef};
use groupgate_core::models::identity::LocalIdentity;
use groupgate_core::models::meta::ObjectMeta;
use groupgate_core::repository::IdentityRepository;
use groupgate_validation::{
    GroupValidator, PruneObserver, ValidationConfig, validate_local_group,
    validate_local_group_update,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Deterministic identity directory.
#[derive(Default)]
struct FakeDirectory {
    identities: HashMap<String, LocalIdentity>,
    /// Ids whose lookup fails with a backend error.
    failing: HashSet<String>,
    /// Ids whose lookup never completes.
    hanging: HashSet<String>,
    lookups: AtomicUsize,
}

impl FakeDirectory {
    fn with(mut self, id: &str, tenant_id: &str, username: &str) -> Self {
        self.identities.insert(
            id.into(),
            LocalIdentity {
                id: id.into(),
                tenant_id: tenant_id.into(),
                username: username.into(),
            },
        );
        self
    }

    fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.into());
        self
    }

    fn hanging(mut self, id: &str) -> Self {
        self.hanging.insert(id.into());
        self
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl IdentityRepository for FakeDirectory {
    async fn get_by_id(&self, id: &str) -> GateResult<LocalIdentity> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.hanging.contains(id) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(id) {
            return Err(GateError::Database("connection reset".into()));
        }
        self.identities
            .get(id)
            .cloned()
            .ok_or_else(|| GateError::NotFound {
                entity: "identity".into(),
                id: id.into(),
            })
    }
}

#[derive(Default)]
struct RecordingObserver {
    pruned: Mutex<Vec<(String, String)>>,
}

impl PruneObserver for RecordingObserver {
    fn member_pruned(&self, group: &str, member_id: &str) {
        self.pruned
            .lock()
            .unwrap()
            .push((group.to_string(), member_id.to_string()));
    }
}

fn group(tenant_id: &str, users: Vec<MemberRef>) -> LocalGroup {
    LocalGroup {
        metadata: ObjectMeta::named("g1"),
        spec: LocalGroupSpec {
            tenant_id: tenant_id.into(),
            display_name: "Group One".into(),
            description: String::new(),
        },
        status: LocalGroupStatus { users },
    }
}

/// A group as stored: carries a uid and creation timestamp.
fn tracked_group(tenant_id: &str, users: Vec<MemberRef>) -> LocalGroup {
    LocalGroup {
        metadata: ObjectMeta {
            uid: Uuid::new_v4().to_string(),
            creation_timestamp: Some(Utc::now()),
            ..ObjectMeta::named("g1")
        },
        ..group(tenant_id, users)
    }
}

fn validator(dir: FakeDirectory) -> GroupValidator<FakeDirectory> {
    GroupValidator::new(dir, ValidationConfig::default())
}

#[tokio::test]
async fn resolved_members_pass_unchanged() {
    let dir = FakeDirectory::default();
    let input = group(
        "t1",
        vec![MemberRef::new("u1", "alice"), MemberRef::new("u2", "bob")],
    );
    let cancel = CancellationToken::new();

    let first = validate_local_group(&cancel, &input, &dir).await;
    assert!(first.is_valid(), "{}", first.errors);
    assert_eq!(first.group, input);

    let second = validate_local_group(&cancel, &first.group, &dir).await;
    assert!(second.is_valid());
    assert_eq!(second.group, input);
    assert_eq!(dir.lookups(), 0);
}

#[tokio::test]
async fn display_name_error_blocks_member_repair() {
    let dir = FakeDirectory::default().with("u1", "t1", "alice");
    let mut input = group(
        "t1",
        vec![MemberRef::unresolved("u1"), MemberRef::unresolved("gone")],
    );
    input.spec.display_name = String::new();

    let result = validator(dir).validate(&CancellationToken::new(), &input).await;

    assert_eq!(result.errors.len(), 1);
    let err = result.errors.iter().next().unwrap();
    assert_eq!(err.kind, FieldErrorKind::Invalid);
    assert_eq!(err.field.as_str(), "spec.displayName");
    assert_eq!(result.group.status.users, input.status.users);
    assert!(result.pruned.is_empty());
}

#[tokio::test]
async fn cross_tenant_member_is_rejected() {
    let dir = FakeDirectory::default()
        .with("u1", "t1", "alice")
        .with("eve", "t2", "eve");
    let input = group(
        "t1",
        vec![MemberRef::unresolved("u1"), MemberRef::unresolved("eve")],
    );

    let result = validator(dir).validate(&CancellationToken::new(), &input).await;

    assert_eq!(result.errors.len(), 1);
    let err = result.errors.iter().next().unwrap();
    assert_eq!(err.kind, FieldErrorKind::Invalid);
    assert_eq!(err.field.as_str(), "status.users");
    assert_eq!(err.value.as_deref(), Some("eve"));
    assert_eq!(err.detail, "must be in the same tenant as the group");
    assert_eq!(result.group.status.users, input.status.users);
}

#[tokio::test]
async fn missing_identity_is_pruned_silently() {
    let dir = FakeDirectory::default().with("u1", "t1", "alice");
    let observer = Arc::new(RecordingObserver::default());
    let input = group(
        "t1",
        vec![MemberRef::unresolved("u1"), MemberRef::unresolved("gone")],
    );

    let result = validator(dir)
        .with_observer(observer.clone())
        .validate(&CancellationToken::new(), &input)
        .await;

    assert!(result.is_valid(), "{}", result.errors);
    assert_eq!(result.group.status.users, vec![MemberRef::new("u1", "alice")]);
    assert_eq!(result.pruned, vec![MemberRef::unresolved("gone")]);
    assert_eq!(
        *observer.pruned.lock().unwrap(),
        vec![("g1".to_string(), "gone".to_string())]
    );
}

#[tokio::test]
async fn retained_members_keep_input_order() {
    let dir = FakeDirectory::default()
        .with("b", "t1", "bob")
        .with("e", "t1", "erin");
    let input = group(
        "t1",
        vec![
            MemberRef::new("a", "ann"),
            MemberRef::unresolved("b"),
            MemberRef::unresolved("c"),
            MemberRef::new("d", "dan"),
            MemberRef::unresolved("e"),
        ],
    );

    let result = validator(dir).validate(&CancellationToken::new(), &input).await;

    assert!(result.is_valid());
    assert_eq!(
        result.group.status.users,
        vec![
            MemberRef::new("a", "ann"),
            MemberRef::new("b", "bob"),
            MemberRef::new("d", "dan"),
            MemberRef::new("e", "erin"),
        ]
    );
}

#[tokio::test]
async fn tenant_change_is_rejected_on_update() {
    let dir = FakeDirectory::default().with("u1", "t2", "alice");
    let old = group("t1", vec![MemberRef::new("u1", "alice")]);
    let new = group("t2", vec![MemberRef::new("u1", "alice")]);

    let result = validate_local_group_update(&CancellationToken::new(), &new, &old, &dir).await;

    assert_eq!(result.errors.len(), 1);
    let err = result.errors.iter().next().unwrap();
    assert_eq!(err.kind, FieldErrorKind::Invalid);
    assert_eq!(err.field.as_str(), "spec.tenantID");
    assert_eq!(err.value.as_deref(), Some("t2"));
    assert_eq!(err.detail, "disallowed: change the tenant");
}

#[tokio::test]
async fn empty_member_id_keeps_input_members() {
    let dir = FakeDirectory::default().with("u1", "t1", "alice");
    let input = group(
        "t1",
        vec![
            MemberRef::unresolved("u1"),
            MemberRef::unresolved(""),
            MemberRef::unresolved("u2"),
        ],
    );

    let result = validator(dir).validate(&CancellationToken::new(), &input).await;

    assert_eq!(result.errors.len(), 1);
    let err = result.errors.iter().next().unwrap();
    assert_eq!(err.kind, FieldErrorKind::Required);
    assert_eq!(err.field.as_str(), "status.users");
    assert_eq!(err.detail, "must specify id");
    assert_eq!(result.group.status.users, input.status.users);
}

#[tokio::test]
async fn resolvable_and_missing_members_commit() {
    let dir = FakeDirectory::default().with("u1", "t1", "alice");
    let input = group(
        "t1",
        vec![MemberRef::unresolved("u1"), MemberRef::unresolved("u2")],
    );

    let result = validator(dir).validate(&CancellationToken::new(), &input).await;

    assert!(result.is_valid());
    assert_eq!(result.group.status.users, vec![MemberRef::new("u1", "alice")]);
    assert_eq!(result.pruned, vec![MemberRef::unresolved("u2")]);
}

#[tokio::test]
async fn lookup_failure_is_internal_error() {
    let dir = FakeDirectory::default()
        .with("u1", "t1", "alice")
        .failing("u2");
    let input = group(
        "t1",
        vec![MemberRef::unresolved("u1"), MemberRef::unresolved("u2")],
    );

    let result = validator(dir).validate(&CancellationToken::new(), &input).await;

    assert_eq!(result.errors.len(), 1);
    let err = result.errors.iter().next().unwrap();
    assert_eq!(err.kind, FieldErrorKind::Internal);
    assert!(err.detail.contains("connection reset"), "{}", err.detail);
    assert_eq!(result.group.status.users, input.status.users);
}

#[tokio::test]
async fn errors_accumulate_across_members() {
    let dir = FakeDirectory::default()
        .with("eve", "t2", "eve")
        .failing("u9");
    let input = group(
        "t1",
        vec![
            MemberRef::unresolved(""),
            MemberRef::unresolved("eve"),
            MemberRef::unresolved("u9"),
        ],
    );

    let result = validator(dir).validate(&CancellationToken::new(), &input).await;

    let kinds: Vec<FieldErrorKind> = result.errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FieldErrorKind::Required,
            FieldErrorKind::Invalid,
            FieldErrorKind::Internal,
        ]
    );
}

#[tokio::test]
async fn cancelled_before_start_skips_lookups() {
    let dir = FakeDirectory::default().with("u1", "t1", "alice");
    let input = group(
        "t1",
        vec![MemberRef::unresolved("u1"), MemberRef::unresolved("u2")],
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    let validator = validator(dir);
    let result = validator.validate(&cancel, &input).await;

    assert_eq!(result.errors.len(), 1);
    let err = result.errors.iter().next().unwrap();
    assert_eq!(err.kind, FieldErrorKind::Internal);
    assert_eq!(err.detail, "context canceled");
    assert_eq!(result.group.status.users, input.status.users);
}

#[tokio::test]
async fn cancelled_token_is_ignored_without_lookups() {
    let dir = FakeDirectory::default();
    let input = group(
        "t1",
        vec![MemberRef::new("u1", "alice"), MemberRef::new("u2", "bob")],
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = validate_local_group(&cancel, &input, &dir).await;

    assert!(result.is_valid(), "{}", result.errors);
    assert_eq!(result.group.status.users, input.status.users);
    assert_eq!(dir.lookups(), 0);
}

#[tokio::test]
async fn cancellation_interrupts_pending_lookup() {
    let dir = Arc::new(
        FakeDirectory::default()
            .with("u2", "t1", "bob")
            .hanging("u1"),
    );
    let input = group(
        "t1",
        vec![MemberRef::unresolved("u1"), MemberRef::unresolved("u2")],
    );
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let validator = GroupValidator::new(dir.clone(), ValidationConfig::default());
    let result = tokio::time::timeout(Duration::from_secs(5), validator.validate(&cancel, &input))
        .await
        .expect("validation should stop once cancelled");

    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors.iter().next().unwrap().kind,
        FieldErrorKind::Internal
    );
    // The pass stops at the interrupted member.
    assert_eq!(dir.lookups(), 1);
    assert_eq!(result.group.status.users, input.status.users);
}

#[tokio::test]
async fn metadata_update_error_does_not_block_member_repair() {
    let dir = FakeDirectory::default().with("u1", "t1", "alice");
    let old = tracked_group("t1", vec![MemberRef::unresolved("u1")]);
    let mut new = old.clone();
    new.metadata.uid = Uuid::new_v4().to_string();

    let result = validator(dir)
        .validate_update(&CancellationToken::new(), &new, &old)
        .await;

    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors.iter().next().unwrap().field.as_str(),
        "metadata.uid"
    );
    assert_eq!(result.group.status.users, vec![MemberRef::new("u1", "alice")]);
}

#[tokio::test]
async fn tenant_change_does_not_block_member_repair() {
    let dir = FakeDirectory::default().with("u1", "t2", "alice");
    let old = group("t1", vec![]);
    let new = group(
        "t2",
        vec![MemberRef::unresolved("u1"), MemberRef::unresolved("gone")],
    );

    let result = validator(dir)
        .validate_update(&CancellationToken::new(), &new, &old)
        .await;

    let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["spec.tenantID"]);
    assert_eq!(result.group.status.users, vec![MemberRef::new("u1", "alice")]);
    assert_eq!(result.pruned, vec![MemberRef::unresolved("gone")]);
}

#[tokio::test]
async fn update_errors_are_reported_in_check_order() {
    let dir = FakeDirectory::default().with("u1", "t2", "alice");
    let old = tracked_group("t1", vec![MemberRef::unresolved("u1")]);
    let mut new = old.clone();
    new.metadata.uid = Uuid::new_v4().to_string();
    new.spec.display_name = String::new();
    new.spec.tenant_id = "t2".into();

    let result = validator(dir)
        .validate_update(&CancellationToken::new(), &new, &old)
        .await;

    let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["metadata.uid", "spec.displayName", "spec.tenantID"]
    );
    assert_eq!(result.group.status.users, vec![MemberRef::unresolved("u1")]);
    assert!(result.pruned.is_empty());
}

#[tokio::test]
async fn valid_update_resolves_members() {
    let dir = FakeDirectory::default().with("u1", "t1", "alice");
    let old = LocalGroup {
        metadata: ObjectMeta {
            uid: Uuid::new_v4().to_string(),
            resource_version: "7".into(),
            generation: 1,
            ..ObjectMeta::named("g1")
        },
        ..group("t1", vec![])
    };
    let mut new = old.clone();
    new.metadata.resource_version = "8".into();
    new.metadata.generation = 2;
    new.status.users = vec![MemberRef::unresolved("u1")];

    let normalized = validator(dir)
        .validate_update(&CancellationToken::new(), &new, &old)
        .await
        .into_result()
        .unwrap();

    assert_eq!(normalized.status.users, vec![MemberRef::new("u1", "alice")]);
}

#[tokio::test]
async fn metadata_and_display_errors_are_reported_together() {
    let dir = FakeDirectory::default();
    let mut input = group("t1", vec![]);
    input.metadata.name = "Not_A_Label".into();
    input.spec.display_name = "x".repeat(300);

    let result = validator(dir).validate(&CancellationToken::new(), &input).await;

    let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["metadata.name", "spec.displayName"]);

    match result.into_result() {
        Err(GateError::Validation { message }) => {
            assert!(message.contains("spec.displayName"), "{message}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn validator_is_shared_across_tasks() {
    let dir = FakeDirectory::default()
        .with("u1", "t1", "alice")
        .with("u2", "t2", "bob");
    let validator = Arc::new(validator(dir));

    let mut handles = Vec::new();
    for (tenant, id, name) in [("t1", "u1", "alice"), ("t2", "u2", "bob")] {
        let validator = validator.clone();
        handles.push(tokio::spawn(async move {
            let input = group(tenant, vec![MemberRef::unresolved(id)]);
            let result = validator.validate(&CancellationToken::new(), &input).await;
            (result, name)
        }));
    }

    for handle in handles {
        let (result, name) = handle.await.unwrap();
        assert!(result.is_valid());
        assert_eq!(result.group.status.users[0].name, name);
    }
}
