//! Generic object metadata rules, for create and update.

use groupgate_core::field::{ErrorList, FieldError, FieldPath};
use groupgate_core::models::meta::ObjectMeta;

use crate::config::ValidationConfig;
use crate::names;

/// Validates metadata of a cluster-scoped object.
pub fn validate_object_meta(
    meta: &ObjectMeta,
    config: &ValidationConfig,
    path: &FieldPath,
) -> ErrorList {
    let mut errs = ErrorList::new();

    if !meta.generate_name.is_empty() {
        for msg in names::group_name(&meta.generate_name, true) {
            errs.push(FieldError::invalid(
                path.child("generateName"),
                &meta.generate_name,
                msg,
            ));
        }
    }

    if meta.name.is_empty() {
        if meta.generate_name.is_empty() {
            errs.push(FieldError::required(
                path.child("name"),
                "name or generateName is required",
            ));
        }
    } else {
        for msg in names::group_name(&meta.name, false) {
            errs.push(FieldError::invalid(path.child("name"), &meta.name, msg));
        }
    }

    if !meta.namespace.is_empty() {
        errs.push(FieldError::forbidden(
            path.child("namespace"),
            "not allowed on this type",
        ));
    }

    if meta.generation < 0 {
        errs.push(FieldError::invalid(
            path.child("generation"),
            meta.generation.to_string(),
            "must be greater than or equal to 0",
        ));
    }

    let labels_path = path.child("labels");
    for (key, value) in &meta.labels {
        for msg in names::qualified_name(key) {
            errs.push(FieldError::invalid(labels_path.clone(), key, msg));
        }
        for msg in names::label_value(value) {
            errs.push(FieldError::invalid(labels_path.key(key), value, msg));
        }
    }

    let annotations_path = path.child("annotations");
    let mut total_size = 0usize;
    for (key, value) in &meta.annotations {
        for msg in names::qualified_name(&key.to_lowercase()) {
            errs.push(FieldError::invalid(annotations_path.clone(), key, msg));
        }
        total_size += key.len() + value.len();
    }
    if total_size > config.total_annotation_size_limit {
        errs.push(FieldError::too_long(
            annotations_path,
            config.total_annotation_size_limit,
        ));
    }

    errs
}

/// Checks that identity fields of the metadata did not change across an
/// update. Resource-version ordering is left to the object store.
pub fn validate_object_meta_update(
    new: &ObjectMeta,
    old: &ObjectMeta,
    path: &FieldPath,
) -> ErrorList {
    let mut errs = ErrorList::new();

    immutable(&mut errs, path.child("name"), &new.name, &old.name);
    immutable(
        &mut errs,
        path.child("namespace"),
        &new.namespace,
        &old.namespace,
    );
    immutable(&mut errs, path.child("uid"), &new.uid, &old.uid);

    if new.creation_timestamp != old.creation_timestamp {
        let value = new
            .creation_timestamp
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_default();
        errs.push(FieldError::invalid(
            path.child("creationTimestamp"),
            value,
            "field is immutable",
        ));
    }

    if new.generation < old.generation {
        errs.push(FieldError::invalid(
            path.child("generation"),
            new.generation.to_string(),
            "must not be decremented",
        ));
    }

    errs
}

fn immutable(errs: &mut ErrorList, field: FieldPath, new: &str, old: &str) {
    if new != old {
        errs.push(FieldError::invalid(field, new, "field is immutable"));
    }
}
