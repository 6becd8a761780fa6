//! Validation for the `[backend]` and `[ideas]` sections.

use url::Url;

use crate::schema::IdeasConfig;

use super::helpers::{validate_identifier, validate_present, validate_range};

/// The endpoint must be an absolute http(s) URL with a host.
pub(crate) fn validate_endpoint(errors: &mut Vec<String>, config: &IdeasConfig) {
    let endpoint = config.backend.endpoint.trim();
    let valid = Url::parse(endpoint).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    });
    if !valid {
        errors.push(format!(
            "backend.endpoint = {endpoint:?} must be an http(s) URL"
        ));
    }
}

pub(crate) fn validate_timeouts(errors: &mut Vec<String>, config: &IdeasConfig) {
    validate_range(
        errors,
        "backend.connect_timeout_secs",
        config.backend.connect_timeout_secs,
        1,
        60,
    );
    validate_range(
        errors,
        "backend.request_timeout_secs",
        config.backend.request_timeout_secs,
        1,
        300,
    );
}

pub(crate) fn validate_identifiers(errors: &mut Vec<String>, config: &IdeasConfig) {
    let ids = [
        ("backend.project_id", &config.backend.project_id),
        ("ideas.database_id", &config.ideas.database_id),
        ("ideas.collection_id", &config.ideas.collection_id),
    ];
    for (name, value) in ids {
        validate_present(errors, name, value);
        validate_identifier(errors, name, value);
    }
}
