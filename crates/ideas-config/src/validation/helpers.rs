//! Shared helpers used by the section validators.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is empty or whitespace.
pub(crate) fn validate_present(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} is empty"));
    }
}

/// Push an error if `value` contains characters the remote service
/// rejects in identifiers (`[a-zA-Z0-9._-]`, max 36).
pub(crate) fn validate_identifier(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !valid_chars || value.len() > 36 || value.starts_with(['.', '_', '-']) {
        errors.push(format!("{name} = {value:?} is not a valid identifier"));
    }
}
