use std::sync::Arc;

use async_trait::async_trait;

use provisio_core::AppResult;
use provisio_domain::{ProjectDescriptor, RoleBindingDescriptor};

/// Directory port resolving email addresses to control-plane user identifiers.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the user identifier for an email, or `None` when no user matches.
    async fn find_user_id_by_email(&self, email: &str) -> AppResult<Option<String>>;
}

/// Object store port applying resources to the control plane.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Applies the project and every binding as one batch.
    ///
    /// A project that already exists is reported as [`provisio_core::AppError::Conflict`].
    async fn apply(
        &self,
        project: &ProjectDescriptor,
        bindings: &[RoleBindingDescriptor],
    ) -> AppResult<()>;
}

/// Wall-clock source used for binding name timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current unix time in seconds.
    fn now_unix_seconds(&self) -> i64;
}

/// Initialized control-plane collaborators.
#[derive(Clone)]
pub struct ControlPlane {
    directory: Arc<dyn UserDirectory>,
    object_store: Arc<dyn ObjectStore>,
}

impl ControlPlane {
    /// Creates a control plane from separate directory and store adapters.
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>, object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            directory,
            object_store,
        }
    }

    /// Creates a control plane from one adapter serving both ports.
    #[must_use]
    pub fn from_adapter<T>(adapter: Arc<T>) -> Self
    where
        T: UserDirectory + ObjectStore + 'static,
    {
        Self {
            directory: adapter.clone(),
            object_store: adapter,
        }
    }

    /// Returns the directory port.
    #[must_use]
    pub fn directory(&self) -> &dyn UserDirectory {
        self.directory.as_ref()
    }

    /// Returns the object store port.
    #[must_use]
    pub fn object_store(&self) -> &dyn ObjectStore {
        self.object_store.as_ref()
    }
}

/// Control-plane availability decided from process configuration.
#[derive(Clone)]
pub enum ControlPlaneAccess {
    /// Credentials were present and the client was initialized.
    Ready(ControlPlane),
    /// The client could not be set up; carries the reason reported to callers.
    Unavailable(String),
}
