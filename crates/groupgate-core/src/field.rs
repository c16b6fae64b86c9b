//! Structured field errors reported during validation.
//!
//! Errors are accumulated into an [`ErrorList`] rather than returned on
//! the first violation, so a caller sees every problem in one pass.

use std::fmt;

use crate::error::{GateError, GateResult};

/// Dotted path to a field, e.g. `spec.displayName` or `metadata.labels[env]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(root: &str) -> Self {
        Self(root.to_string())
    }

    /// Builds a path from consecutive segments: `from_segments(&["status", "users"])`.
    pub fn from_segments(segments: &[&str]) -> Self {
        Self(segments.join("."))
    }

    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}[{key}]", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// A mandatory field is missing.
    Required,
    /// A value is present but violates a rule.
    Invalid,
    /// The field may not be set on this type.
    Forbidden,
    /// A value exceeds its size limit.
    TooLong,
    /// An external dependency failed; not attributable to the input.
    Internal,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldErrorKind::Required => "Required value",
            FieldErrorKind::Invalid => "Invalid value",
            FieldErrorKind::Forbidden => "Forbidden",
            FieldErrorKind::TooLong => "Too long",
            FieldErrorKind::Internal => "Internal error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub field: FieldPath,
    /// The offending value, where one applies.
    pub value: Option<String>,
    pub detail: String,
}

impl FieldError {
    pub fn required(field: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            kind: FieldErrorKind::Required,
            field,
            value: None,
            detail: detail.into(),
        }
    }

    pub fn invalid(field: FieldPath, value: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: FieldErrorKind::Invalid,
            field,
            value: Some(value.into()),
            detail: detail.into(),
        }
    }

    pub fn forbidden(field: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            kind: FieldErrorKind::Forbidden,
            field,
            value: None,
            detail: detail.into(),
        }
    }

    pub fn too_long(field: FieldPath, max: usize) -> Self {
        Self {
            kind: FieldErrorKind::TooLong,
            field,
            value: None,
            detail: format!("must have at most {max} bytes"),
        }
    }

    pub fn internal(field: FieldPath, err: &GateError) -> Self {
        Self {
            kind: FieldErrorKind::Internal,
            field,
            value: None,
            detail: err.to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(
                f,
                "{}: {}: {:?}: {}",
                self.field, self.kind, value, self.detail
            ),
            None => write!(f, "{}: {}: {}", self.field, self.kind, self.detail),
        }
    }
}

impl std::error::Error for FieldError {}

/// Ordered collection of field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<FieldError>);

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: FieldError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Errors of the given kind, in report order.
    pub fn of_kind(&self, kind: FieldErrorKind) -> impl Iterator<Item = &FieldError> {
        self.0.iter().filter(move |e| e.kind == kind)
    }

    /// Collapses the list into a single result for callers that only
    /// need admit/reject.
    pub fn into_result(self) -> GateResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(GateError::Validation {
                message: self.to_string(),
            })
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() == 1 {
            return write!(f, "{}", self.0[0]);
        }
        f.write_str("[")?;
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{err}")?;
        }
        f.write_str("]")
    }
}

impl Extend<FieldError> for ErrorList {
    fn extend<T: IntoIterator<Item = FieldError>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
