use std::str::FromStr;

use provisio_core::AppError;
use serde::{Deserialize, Serialize};

/// Roles that may be granted inside a project.
///
/// The set is closed: anything else submitted by a client is rejected before
/// any control-plane call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectRole {
    /// Full control over the project and its members.
    #[serde(rename = "project-owner")]
    Owner,
    /// Read-only access to project resources.
    #[serde(rename = "project-viewer")]
    Viewer,
    /// Read and write access to project resources.
    #[serde(rename = "project-editor")]
    Editor,
}

impl ProjectRole {
    /// Returns the control-plane role reference for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "project-owner",
            Self::Viewer => "project-viewer",
            Self::Editor => "project-editor",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ProjectRole] = &[
            ProjectRole::Owner,
            ProjectRole::Viewer,
            ProjectRole::Editor,
        ];

        ALL
    }

    /// Returns whether a transport value names a known role.
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        Self::from_str(value).is_ok()
    }

    /// Returns every role reference joined for diagnostic messages.
    #[must_use]
    pub fn catalog_display() -> String {
        Self::all()
            .iter()
            .map(ProjectRole::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ProjectRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "project-owner" => Ok(Self::Owner),
            "project-viewer" => Ok(Self::Viewer),
            "project-editor" => Ok(Self::Editor),
            _ => Err(AppError::Validation(format!(
                "unknown project role '{value}'"
            ))),
        }
    }
}

impl std::fmt::Display for ProjectRole {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::ProjectRole;

    #[test]
    fn role_roundtrip_transport_value() {
        for role in ProjectRole::all() {
            let restored = ProjectRole::from_str(role.as_str());
            assert_eq!(restored.ok(), Some(*role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(!ProjectRole::is_valid("admin"));
        assert!(!ProjectRole::is_valid("Project-Owner"));
        assert!(!ProjectRole::is_valid(""));
    }

    #[test]
    fn catalog_display_lists_every_role() {
        let display = ProjectRole::catalog_display();
        assert!(display.contains("project-owner"));
        assert!(display.contains("project-viewer"));
        assert!(display.contains("project-editor"));
    }
}
