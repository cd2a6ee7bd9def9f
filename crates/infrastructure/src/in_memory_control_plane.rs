use std::collections::HashMap;

use async_trait::async_trait;
use provisio_application::{ObjectStore, UserDirectory};
use provisio_core::{AppError, AppResult};
use provisio_domain::{ProjectDescriptor, RoleBindingDescriptor};
use tokio::sync::RwLock;
use tracing::info;

/// Project stored by the in-memory control plane with the bindings applied alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProject {
    /// Applied project descriptor.
    pub project: ProjectDescriptor,
    /// Bindings applied in the same batch.
    pub bindings: Vec<RoleBindingDescriptor>,
}

/// In-process control plane for local development and tests.
#[derive(Debug, Default)]
pub struct InMemoryControlPlane {
    users: HashMap<String, String>,
    projects: RwLock<HashMap<String, StoredProject>>,
}

impl InMemoryControlPlane {
    /// Creates a control plane whose directory knows the given `(email, user id)` pairs.
    #[must_use]
    pub fn with_users<I, E, U>(users: I) -> Self
    where
        I: IntoIterator<Item = (E, U)>,
        E: Into<String>,
        U: Into<String>,
    {
        Self {
            users: users
                .into_iter()
                .map(|(email, user_id)| (email.into().to_lowercase(), user_id.into()))
                .collect(),
            projects: RwLock::new(HashMap::new()),
        }
    }

    /// Parses `email=userId` pairs separated by commas.
    pub fn from_seed(seed: &str) -> AppResult<Self> {
        let users = seed
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry
                    .split_once('=')
                    .map(|(email, user_id)| (email.trim(), user_id.trim()))
                    .filter(|(email, user_id)| !email.is_empty() && !user_id.is_empty())
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "seed user entry '{entry}' must look like email=userId"
                        ))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self::with_users(users))
    }

    /// Returns a stored project by name.
    pub async fn project(&self, name: &str) -> Option<StoredProject> {
        self.projects.read().await.get(name).cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryControlPlane {
    async fn find_user_id_by_email(&self, email: &str) -> AppResult<Option<String>> {
        Ok(self.users.get(&email.to_lowercase()).cloned())
    }
}

#[async_trait]
impl ObjectStore for InMemoryControlPlane {
    async fn apply(
        &self,
        project: &ProjectDescriptor,
        bindings: &[RoleBindingDescriptor],
    ) -> AppResult<()> {
        let name = project.name().as_str().to_owned();
        let mut projects = self.projects.write().await;

        if projects.contains_key(&name) {
            return Err(AppError::Conflict(format!(
                "project '{name}' already exists"
            )));
        }

        info!(
            project = name.as_str(),
            binding_count = bindings.len(),
            "in-memory control plane applied batch"
        );
        projects.insert(
            name,
            StoredProject {
                project: project.clone(),
                bindings: bindings.to_vec(),
            },
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use provisio_application::{ObjectStore, UserDirectory};
    use provisio_core::AppError;
    use provisio_domain::{ProjectDescriptor, ProjectRole, RoleBindingDescriptor};

    use super::InMemoryControlPlane;

    #[tokio::test]
    async fn directory_lookup_ignores_email_case() {
        let control_plane = InMemoryControlPlane::with_users([("Alice@Example.com", "u1")]);

        let found = control_plane.find_user_id_by_email("alice@example.com").await;
        let missing = control_plane.find_user_id_by_email("bob@example.com").await;

        assert_eq!(found.ok().flatten().as_deref(), Some("u1"));
        assert!(matches!(missing, Ok(None)));
    }

    #[test]
    fn seed_parsing_accepts_pairs_and_rejects_garbage() {
        assert!(InMemoryControlPlane::from_seed("a@b.com=u1, c@d.com = u2 ,").is_ok());
        assert!(InMemoryControlPlane::from_seed("").is_ok());
        assert!(InMemoryControlPlane::from_seed("a@b.com").is_err());
        assert!(InMemoryControlPlane::from_seed("a@b.com=").is_err());
    }

    #[tokio::test]
    async fn second_apply_of_same_project_conflicts() {
        let control_plane = InMemoryControlPlane::default();
        let project = ProjectDescriptor::new("demo", Some("Demo".to_owned()));
        let binding = RoleBindingDescriptor::new(
            "assign-demo-u1-g0-1700000000",
            "u1",
            ProjectRole::Editor,
            "demo",
        );
        let (Ok(project), Ok(binding)) = (project, binding) else {
            panic!("sample descriptors must be valid");
        };

        let first = control_plane.apply(&project, &[binding.clone()]).await;
        let second = control_plane.apply(&project, &[]).await;

        assert!(first.is_ok());
        assert!(matches!(second, Err(AppError::Conflict(_))));
        let stored = control_plane.project("demo").await;
        assert_eq!(stored.map(|stored| stored.bindings), Some(vec![binding]));
    }
}
