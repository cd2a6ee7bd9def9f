//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod identifier;
mod naming;
mod resource;
mod role;

pub use identifier::{
    IdentifierIssue, USER_ID_MIN_LENGTH, UserToken, looks_like_email, split_user_tokens,
    validate_email,
};
pub use naming::{
    MAX_RESOURCE_NAME_LENGTH, NAME_COMPONENT_MAX_LENGTH, is_valid_resource_name,
    role_binding_name, sanitize_name, truncate_name,
};
pub use resource::{ProjectDescriptor, RoleBindingDescriptor};
pub use role::ProjectRole;
