//! Name format rules.
//!
//! Each check returns the list of violated rules as human-readable
//! messages; an empty list means the value is acceptable.

use std::sync::LazyLock;

use regex::Regex;

pub const DNS1123_LABEL_MAX_LENGTH: usize = 63;
pub const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;
pub const QUALIFIED_NAME_MAX_LENGTH: usize = 63;
pub const LABEL_VALUE_MAX_LENGTH: usize = 63;

static DNS1123_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("static regex"));

static DNS1123_SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("static regex")
});

static QUALIFIED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$").expect("static regex")
});

/// Checks that `value` is a lowercase RFC 1123 label.
pub fn dns1123_label(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > DNS1123_LABEL_MAX_LENGTH {
        errs.push(max_len_error(DNS1123_LABEL_MAX_LENGTH));
    }
    if !DNS1123_LABEL.is_match(value) {
        errs.push(
            "a lowercase RFC 1123 label must consist of lower case alphanumeric \
             characters or '-', and must start and end with an alphanumeric character"
                .to_string(),
        );
    }
    errs
}

/// Checks that `value` is a lowercase RFC 1123 subdomain.
pub fn dns1123_subdomain(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
        errs.push(max_len_error(DNS1123_SUBDOMAIN_MAX_LENGTH));
    }
    if !DNS1123_SUBDOMAIN.is_match(value) {
        errs.push(
            "a lowercase RFC 1123 subdomain must consist of lower case alphanumeric \
             characters, '-' or '.', and must start and end with an alphanumeric character"
                .to_string(),
        );
    }
    errs
}

/// Group name check. With `prefix` set the value is a `generateName`
/// prefix and a single trailing `-` is allowed.
pub fn group_name(value: &str, prefix: bool) -> Vec<String> {
    let value = if prefix {
        value.strip_suffix('-').unwrap_or(value)
    } else {
        value
    };
    dns1123_label(value)
}

/// Checks a qualified name: an optional subdomain prefix followed by `/`
/// and a name part, e.g. `example.com/team`.
pub fn qualified_name(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    let parts: Vec<&str> = value.split('/').collect();
    let name = match parts.as_slice() {
        [name] => *name,
        [prefix, name] => {
            if prefix.is_empty() {
                errs.push("prefix part must be non-empty".to_string());
            } else {
                errs.extend(
                    dns1123_subdomain(prefix)
                        .into_iter()
                        .map(|msg| format!("prefix part {msg}")),
                );
            }
            *name
        }
        _ => {
            errs.push(
                "a qualified name must consist of an optional DNS subdomain prefix and '/' \
                 followed by a name part"
                    .to_string(),
            );
            return errs;
        }
    };

    if name.is_empty() {
        errs.push("name part must be non-empty".to_string());
    } else {
        if name.len() > QUALIFIED_NAME_MAX_LENGTH {
            errs.push(format!("name part {}", max_len_error(QUALIFIED_NAME_MAX_LENGTH)));
        }
        if !QUALIFIED_NAME.is_match(name) {
            errs.push(
                "name part must consist of alphanumeric characters, '-', '_' or '.', \
                 and must start and end with an alphanumeric character"
                    .to_string(),
            );
        }
    }
    errs
}

/// Checks a label value. Empty values are allowed.
pub fn label_value(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > LABEL_VALUE_MAX_LENGTH {
        errs.push(max_len_error(LABEL_VALUE_MAX_LENGTH));
    }
    if !value.is_empty() && !QUALIFIED_NAME.is_match(value) {
        errs.push(
            "a valid label must be an empty string or consist of alphanumeric characters, \
             '-', '_' or '.', and must start and end with an alphanumeric character"
                .to_string(),
        );
    }
    errs
}

/// Checks a human-facing display name. Reports at most one problem.
pub fn display_name(value: &str, max_length: usize) -> Option<String> {
    if value.trim().is_empty() {
        return Some("must specify display name".to_string());
    }
    if value.chars().count() > max_length {
        return Some(format!("must be no more than {max_length} characters"));
    }
    if value.chars().any(char::is_control) {
        return Some("must not contain control characters".to_string());
    }
    None
}

fn max_len_error(max: usize) -> String {
    format!("must be no more than {max} characters")
}
