//! RFC-1123 resource name synthesis for role bindings.
//!
//! The control plane caps resource names at 63 characters. Binding names are
//! composed from the project name, the submitted user token, the group index
//! and a unix timestamp:
//!
//! `assign-<project>-<user>-g<group index>-<timestamp>`
//!
//! Project and user components are sanitized and capped at 20 characters
//! each; when the suffix grows (large group indexes) the components shrink so
//! the ceiling always holds.

/// Maximum length of a control-plane resource name.
pub const MAX_RESOURCE_NAME_LENGTH: usize = 63;

/// Maximum length of the project and user components of a binding name.
pub const NAME_COMPONENT_MAX_LENGTH: usize = 20;

const BINDING_NAME_PREFIX: &str = "assign-";

/// Lowercases the input, collapses every run of characters outside
/// `[a-z0-9-]` into one hyphen and trims leading and trailing hyphens.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut sanitized = String::with_capacity(lowered.len());
    let mut in_invalid_run = false;

    for character in lowered.chars() {
        if character.is_ascii_lowercase() || character.is_ascii_digit() || character == '-' {
            sanitized.push(character);
            in_invalid_run = false;
        } else if !in_invalid_run {
            sanitized.push('-');
            in_invalid_run = true;
        }
    }

    sanitized.trim_matches('-').to_owned()
}

/// Returns at most `max_len` leading characters of `name`.
///
/// Counts code points, so non-ASCII input is never split inside a character.
/// Sanitized names are ASCII, where this is the same as a byte cut.
#[must_use]
pub fn truncate_name(name: &str, max_len: usize) -> String {
    match name.char_indices().nth(max_len) {
        Some((byte_index, _)) => name[..byte_index].to_owned(),
        None => name.to_owned(),
    }
}

/// Builds the resource name of one role binding.
///
/// Names created in the same wall-clock second for the same truncated
/// project, user and group index collide.
#[must_use]
pub fn role_binding_name(
    project_name: &str,
    user_token: &str,
    group_index: usize,
    timestamp_seconds: i64,
) -> String {
    let suffix = format!("-g{group_index}-{timestamp_seconds}");
    let budget = MAX_RESOURCE_NAME_LENGTH
        .saturating_sub(BINDING_NAME_PREFIX.len() + 1 + suffix.len());
    let project_budget = NAME_COMPONENT_MAX_LENGTH.min(budget / 2);
    let user_budget = NAME_COMPONENT_MAX_LENGTH.min(budget - project_budget);

    let project = truncate_name(&sanitize_name(project_name), project_budget);
    let user = truncate_name(&sanitize_name(user_token), user_budget);
    let name = format!("{BINDING_NAME_PREFIX}{project}-{user}{suffix}");

    if name.len() <= MAX_RESOURCE_NAME_LENGTH {
        return name;
    }

    truncate_name(&name, MAX_RESOURCE_NAME_LENGTH)
        .trim_end_matches('-')
        .to_owned()
}

/// Returns whether `name` is a lowercase RFC-1123 label within the length ceiling.
#[must_use]
pub fn is_valid_resource_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_RESOURCE_NAME_LENGTH
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|character| {
                character.is_ascii_lowercase() || character.is_ascii_digit() || character == '-'
            })
}
