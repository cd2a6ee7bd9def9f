//! Project provisioning use-case.
//!
//! Validates a create-project request, resolves every submitted user token to
//! a control-plane user, and applies the project together with its role
//! bindings in one batch. Nothing is written unless every token resolved.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use provisio_core::{AppError, AppResult};
use provisio_domain::{ProjectRole, RoleBindingDescriptor, UserToken, role_binding_name};

use crate::{Clock, ControlPlane, ControlPlaneAccess};

mod validation;

pub use validation::{ValidatedGroup, ValidatedRequest, ValidationError, validate_request};

/// Default deadline shared by every control-plane call of one request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One group of users sharing a role, as submitted by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserGroupInput {
    /// Comma-separated emails or user identifiers.
    pub user_ids: String,
    /// Role to grant to every user in the group.
    pub role: String,
}

/// Input payload for project creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateProjectInput {
    /// Unique project name.
    pub app_id: String,
    /// Optional project description.
    pub description: Option<String>,
    /// Groups of users to grant roles to.
    pub user_groups: Vec<UserGroupInput>,
}

/// Failure to resolve one email address through the directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// No user is registered under the email.
    #[error("User with email '{email}' not found in the directory")]
    NotFound {
        /// Email as submitted.
        email: String,
    },

    /// The lookup itself failed or timed out.
    #[error("Error retrieving user '{email}': {message}")]
    LookupFailed {
        /// Email as submitted.
        email: String,
        /// Message reported by the directory client.
        message: String,
    },
}

/// Result of one create-project call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningOutcome {
    /// Project and bindings were applied.
    Created {
        /// Name of the created project.
        project_name: String,
        /// Number of role bindings applied with the project.
        binding_count: usize,
    },
    /// The request failed structural validation.
    Invalid(ValidationError),
    /// The control-plane client is not configured.
    NotConfigured {
        /// Reason reported to the caller.
        reason: String,
    },
    /// One or more emails could not be resolved; nothing was applied.
    UnresolvedUsers {
        /// Name of the project that was not created.
        project_name: String,
        /// Every failed lookup, in request order.
        errors: Vec<ResolutionError>,
    },
    /// A project with the same name already exists.
    AlreadyExists {
        /// Name of the conflicting project.
        project_name: String,
    },
    /// The control plane rejected the batch for another reason.
    StoreFailed {
        /// Message reported by the store client.
        message: String,
    },
}

impl ProvisioningOutcome {
    /// Returns whether the project was created.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Token resolved to a control-plane user, kept until its binding is built.
struct ResolvedUser<'a> {
    group_index: usize,
    role: ProjectRole,
    token: &'a str,
    user_id: String,
}

/// Application service orchestrating project and role binding creation.
#[derive(Clone)]
pub struct ProvisioningService {
    control_plane: ControlPlaneAccess,
    clock: Arc<dyn Clock>,
    request_timeout: Duration,
}

impl ProvisioningService {
    /// Creates a new provisioning service.
    #[must_use]
    pub fn new(
        control_plane: ControlPlaneAccess,
        clock: Arc<dyn Clock>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            control_plane,
            clock,
            request_timeout,
        }
    }

    /// Validates the request and provisions the project with its bindings.
    pub async fn create_project(&self, input: CreateProjectInput) -> ProvisioningOutcome {
        let deadline = Instant::now() + self.request_timeout;

        let request = match validate_request(&input) {
            Ok(request) => request,
            Err(error) => return ProvisioningOutcome::Invalid(error),
        };

        match &self.control_plane {
            ControlPlaneAccess::Ready(control_plane) => {
                self.provision(control_plane, &request, deadline).await
            }
            ControlPlaneAccess::Unavailable(reason) => ProvisioningOutcome::NotConfigured {
                reason: reason.clone(),
            },
        }
    }

    async fn provision(
        &self,
        control_plane: &ControlPlane,
        request: &ValidatedRequest,
        deadline: Instant,
    ) -> ProvisioningOutcome {
        let project_name = request.project.name().as_str();
        let mut resolved = Vec::new();
        let mut errors = Vec::new();

        for group in &request.groups {
            for token in &group.tokens {
                match resolve_user(control_plane, token, deadline).await {
                    Ok(user_id) => resolved.push(ResolvedUser {
                        group_index: group.index,
                        role: group.role,
                        token: token.as_str(),
                        user_id,
                    }),
                    Err(error) => {
                        warn!(error = %error, "user resolution failed");
                        errors.push(error);
                    }
                }
            }
        }

        if !errors.is_empty() {
            return ProvisioningOutcome::UnresolvedUsers {
                project_name: project_name.to_owned(),
                errors,
            };
        }

        let bindings = match self.build_bindings(project_name, resolved) {
            Ok(bindings) => bindings,
            Err(error) => {
                return ProvisioningOutcome::StoreFailed {
                    message: error.message().to_owned(),
                };
            }
        };

        let applied = timeout_at(
            deadline,
            control_plane
                .object_store()
                .apply(&request.project, &bindings),
        )
        .await;

        match applied {
            Ok(Ok(())) => {
                info!(
                    project = project_name,
                    binding_count = bindings.len(),
                    "project and role bindings applied"
                );
                ProvisioningOutcome::Created {
                    project_name: project_name.to_owned(),
                    binding_count: bindings.len(),
                }
            }
            Ok(Err(error)) if is_conflict(&error) => ProvisioningOutcome::AlreadyExists {
                project_name: project_name.to_owned(),
            },
            Ok(Err(error)) => ProvisioningOutcome::StoreFailed {
                message: error.message().to_owned(),
            },
            Err(_) => ProvisioningOutcome::StoreFailed {
                message: "control plane did not answer before the request deadline".to_owned(),
            },
        }
    }

    fn build_bindings(
        &self,
        project_name: &str,
        resolved: Vec<ResolvedUser<'_>>,
    ) -> AppResult<Vec<RoleBindingDescriptor>> {
        resolved
            .into_iter()
            .map(|user| {
                let name = role_binding_name(
                    project_name,
                    user.token,
                    user.group_index,
                    self.clock.now_unix_seconds(),
                );
                debug!(
                    binding = name.as_str(),
                    user_id = user.user_id.as_str(),
                    role = user.role.as_str(),
                    "role binding prepared"
                );
                RoleBindingDescriptor::new(name, user.user_id, user.role, project_name)
            })
            .collect()
    }
}

async fn resolve_user(
    control_plane: &ControlPlane,
    token: &UserToken,
    deadline: Instant,
) -> Result<String, ResolutionError> {
    let email = match token {
        UserToken::UserId(user_id) => return Ok(user_id.clone()),
        UserToken::Email(email) => email,
    };

    info!(email = email.as_str(), "looking up user by email");
    let lookup = timeout_at(
        deadline,
        control_plane.directory().find_user_id_by_email(email),
    )
    .await;

    match lookup {
        Ok(Ok(Some(user_id))) if !user_id.trim().is_empty() => {
            info!(email = email.as_str(), user_id = user_id.as_str(), "user resolved");
            Ok(user_id)
        }
        Ok(Ok(_)) => Err(ResolutionError::NotFound {
            email: email.clone(),
        }),
        Ok(Err(error)) => Err(ResolutionError::LookupFailed {
            email: email.clone(),
            message: error.message().to_owned(),
        }),
        Err(_) => Err(ResolutionError::LookupFailed {
            email: email.clone(),
            message: "directory did not answer before the request deadline".to_owned(),
        }),
    }
}

fn is_conflict(error: &AppError) -> bool {
    if matches!(error, AppError::Conflict(_)) {
        return true;
    }

    let message = error.message().to_lowercase();
    message.contains("already exists") || message.contains("conflict")
}
