//! Groupgate Validation: admission checks for local groups.
//!
//! Validates object metadata and display name, reconciles the member
//! list against an [`IdentityRepository`](groupgate_core::repository::IdentityRepository),
//! and guards the owning tenant across updates.

pub mod config;
mod membership;
pub mod meta;
pub mod names;
pub mod observer;
pub mod validator;

pub use config::ValidationConfig;
pub use observer::{PruneObserver, TracingPruneObserver};
pub use validator::{
    GroupValidation, GroupValidator, validate_local_group, validate_local_group_update,
};
