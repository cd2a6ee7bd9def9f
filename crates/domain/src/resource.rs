use provisio_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{ProjectRole, is_valid_resource_name};

/// Project resource submitted to the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    name: NonEmptyString,
    description: String,
}

impl ProjectDescriptor {
    /// Creates a project descriptor, defaulting a blank description to one
    /// that embeds the project name.
    pub fn new(name: impl Into<String>, description: Option<String>) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;
        let description = description
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| format!("Project created via API: {name}"));

        Ok(Self { name, description })
    }

    /// Returns the unique project name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

/// Role binding granting one role to one user inside one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBindingDescriptor {
    name: String,
    user_id: NonEmptyString,
    role: ProjectRole,
    project_ref: NonEmptyString,
}

impl RoleBindingDescriptor {
    /// Creates a validated role binding descriptor.
    pub fn new(
        name: impl Into<String>,
        user_id: impl Into<String>,
        role: ProjectRole,
        project_ref: impl Into<String>,
    ) -> AppResult<Self> {
        let name = name.into();
        if !is_valid_resource_name(&name) {
            return Err(AppError::Validation(format!(
                "role binding name '{name}' is not a valid resource name"
            )));
        }

        Ok(Self {
            name,
            user_id: NonEmptyString::new(user_id)?,
            role,
            project_ref: NonEmptyString::new(project_ref)?,
        })
    }

    /// Returns the binding resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the resolved user identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the granted role.
    #[must_use]
    pub fn role(&self) -> ProjectRole {
        self.role
    }

    /// Returns the name of the project the role is granted in.
    #[must_use]
    pub fn project_ref(&self) -> &str {
        self.project_ref.as_str()
    }
}
