//! Groupgate Core: domain models, field errors and repository traits
//! shared by the validation and database crates.

pub mod error;
pub mod field;
pub mod models;
pub mod repository;

pub use error::{GateError, GateResult};
pub use field::{ErrorList, FieldError, FieldErrorKind, FieldPath};
