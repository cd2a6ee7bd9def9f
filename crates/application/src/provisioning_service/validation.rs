use std::str::FromStr;

use thiserror::Error;

use provisio_domain::{
    IdentifierIssue, ProjectDescriptor, ProjectRole, UserToken, split_user_tokens,
};

use super::CreateProjectInput;

/// First structural defect found in a create-project request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The project name is missing or blank.
    #[error("Project name (appID) is required")]
    MissingProjectName,

    /// The request carries no user groups.
    #[error("At least one user group is required")]
    NoUserGroups,

    /// A group names a role outside the catalog.
    #[error(
        "Invalid role '{role}' in group {group_index}. Must be one of: {catalog}",
        catalog = ProjectRole::catalog_display()
    )]
    InvalidRole {
        /// Zero-based group position in the request.
        group_index: usize,
        /// Role as submitted.
        role: String,
    },

    /// A token looks like an email address but is malformed.
    #[error(
        "Invalid email format: '{token}' in group {group_index}. Email addresses must contain @ symbol and be properly formatted (e.g., user@domain.com)."
    )]
    InvalidEmail {
        /// Zero-based group position in the request.
        group_index: usize,
        /// Offending token.
        token: String,
    },

    /// A token is an opaque user identifier that is too short.
    #[error("Invalid user ID: '{token}' in group {group_index} (too short)")]
    UserIdTooShort {
        /// Zero-based group position in the request.
        group_index: usize,
        /// Offending token.
        token: String,
    },
}

/// One user group after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedGroup {
    /// Zero-based group position in the request.
    pub index: usize,
    /// Role granted to every user of the group.
    pub role: ProjectRole,
    /// Non-empty tokens in submission order.
    pub tokens: Vec<UserToken>,
}

/// Request that passed every structural check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Project to create.
    pub project: ProjectDescriptor,
    /// Groups in request order.
    pub groups: Vec<ValidatedGroup>,
}

/// Validates a request, stopping at the first defect.
///
/// Checks run in a fixed order: project name, group presence, then per group
/// the role followed by each token.
pub fn validate_request(input: &CreateProjectInput) -> Result<ValidatedRequest, ValidationError> {
    let project = ProjectDescriptor::new(input.app_id.as_str(), input.description.clone())
        .map_err(|_| ValidationError::MissingProjectName)?;

    if input.user_groups.is_empty() {
        return Err(ValidationError::NoUserGroups);
    }

    let mut groups = Vec::with_capacity(input.user_groups.len());
    for (index, group) in input.user_groups.iter().enumerate() {
        let role =
            ProjectRole::from_str(group.role.as_str()).map_err(|_| ValidationError::InvalidRole {
                group_index: index,
                role: group.role.clone(),
            })?;

        let tokens = split_user_tokens(group.user_ids.as_str())
            .map(|token| {
                UserToken::classify(token).map_err(|issue| match issue {
                    IdentifierIssue::MalformedEmail => ValidationError::InvalidEmail {
                        group_index: index,
                        token: token.to_owned(),
                    },
                    IdentifierIssue::UserIdTooShort => ValidationError::UserIdTooShort {
                        group_index: index,
                        token: token.to_owned(),
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        groups.push(ValidatedGroup {
            index,
            role,
            tokens,
        });
    }

    Ok(ValidatedRequest { project, groups })
}
