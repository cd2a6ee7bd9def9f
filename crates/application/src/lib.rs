//! Application services and ports.

#![forbid(unsafe_code)]

mod provisioning_ports;
mod provisioning_service;

pub use provisioning_ports::{Clock, ControlPlane, ControlPlaneAccess, ObjectStore, UserDirectory};
pub use provisioning_service::{
    CreateProjectInput, DEFAULT_REQUEST_TIMEOUT, ProvisioningOutcome, ProvisioningService,
    ResolutionError, UserGroupInput, ValidatedGroup, ValidatedRequest, ValidationError,
    validate_request,
};
