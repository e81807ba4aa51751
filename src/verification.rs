//! Format check for NGO registry identifiers.
//!
//! Registry ids look like `MH/2020/0123456`. There is no live registry call;
//! an id passes when, with the `/` and `\` separators removed, at least ten
//! alphanumeric characters remain.

/// Decide whether an NGO registration is accepted as verified.
///
/// `org_name` is part of the registration payload and reserved for a real
/// registry lookup; the format check does not consult it.
pub fn verify_registry_id(registry_id: &str, _org_name: &str) -> bool {
    let stripped: String = registry_id
        .chars()
        .filter(|c| *c != '/' && *c != '\\')
        .collect();

    stripped.len() >= 10 && stripped.chars().all(|c| c.is_ascii_alphanumeric())
}
