//! Classification and validation of user tokens submitted by clients.
//!
//! A token is either meant as an email address, which is resolved through the
//! directory, or an opaque user identifier that is bound as-is. Classification
//! is a heuristic that only picks the validation rule to apply.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum length of an opaque user identifier.
pub const USER_ID_MIN_LENGTH: usize = 2;

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok()
});

/// Domain fragments that mark a token as an intended email address.
const COMMON_DOMAIN_FRAGMENTS: &[&str] = &[
    ".com", ".org", ".net", ".edu", ".gov", ".co.", ".io", ".dev",
];

/// Returns whether the token appears to be intended as an email address,
/// even when it is malformed (for example a missing `@`).
#[must_use]
pub fn looks_like_email(token: &str) -> bool {
    token.contains('@')
        || COMMON_DOMAIN_FRAGMENTS
            .iter()
            .any(|fragment| token.contains(fragment))
}

/// Strict `local-part@domain.tld` check with an alphabetic TLD of at least two
/// characters.
#[must_use]
pub fn validate_email(token: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|regex| regex.is_match(token))
}

/// Splits a comma-separated token list, trimming entries and skipping empty ones.
pub fn split_user_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|token| !token.is_empty())
}

/// Reason a token failed identifier validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierIssue {
    /// The token looks like an email address but is not well formed.
    MalformedEmail,
    /// The token is an opaque identifier shorter than [`USER_ID_MIN_LENGTH`].
    UserIdTooShort,
}

/// A validated user token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserToken {
    /// Email address that must be resolved through the directory.
    Email(String),
    /// Opaque identifier used directly as the bound user.
    UserId(String),
}

impl UserToken {
    /// Classifies and validates one trimmed token.
    pub fn classify(token: &str) -> Result<Self, IdentifierIssue> {
        if looks_like_email(token) {
            if !validate_email(token) {
                return Err(IdentifierIssue::MalformedEmail);
            }

            return Ok(Self::Email(token.to_owned()));
        }

        if token.chars().count() < USER_ID_MIN_LENGTH {
            return Err(IdentifierIssue::UserIdTooShort);
        }

        Ok(Self::UserId(token.to_owned()))
    }

    /// Returns the raw token text as submitted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(value) | Self::UserId(value) => value.as_str(),
        }
    }
}
