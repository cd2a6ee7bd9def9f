//! Maps provisioning outcomes to the response envelope and writes it.
//!
//! Every create-project response goes through [`respond`]. Success and failure
//! travel in the envelope's `success` field; the status line is `200 OK` unless
//! the envelope itself cannot be encoded.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use provisio_application::ProvisioningOutcome;
use tracing::{error, info, warn};

use crate::dto::ResponseEnvelope;

pub fn envelope_for(outcome: &ProvisioningOutcome) -> ResponseEnvelope {
    let message = match outcome {
        ProvisioningOutcome::Created {
            project_name,
            binding_count,
        } => format!(
            "Project '{project_name}' created successfully with {binding_count} user role assignments"
        ),
        ProvisioningOutcome::Invalid(error) => error.to_string(),
        ProvisioningOutcome::NotConfigured { reason } => reason.clone(),
        ProvisioningOutcome::UnresolvedUsers {
            project_name,
            errors,
        } => {
            let bullets = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n• ");
            format!(
                "Failed to create project '{project_name}' because some users could not be found:\n• {bullets}"
            )
        }
        ProvisioningOutcome::AlreadyExists { project_name } => {
            format!("Project '{project_name}' already exists")
        }
        ProvisioningOutcome::StoreFailed { message } => {
            format!("Failed to create project and assign roles: {message}")
        }
    };

    ResponseEnvelope {
        success: outcome.is_success(),
        message,
    }
}

pub fn malformed_request(rejection: &JsonRejection) -> ResponseEnvelope {
    ResponseEnvelope {
        success: false,
        message: format!("Invalid request body: {}", rejection.body_text()),
    }
}

pub fn respond(envelope: ResponseEnvelope) -> Response {
    let body = match serde_json::to_vec(&envelope) {
        Ok(body) => body,
        Err(encode_error) => {
            error!(error = %encode_error, "failed to encode response envelope");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    if envelope.success {
        info!(message = envelope.message.as_str(), "SUCCESS");
    } else {
        warn!(message = envelope.message.as_str(), "ERROR");
    }

    ([(CONTENT_TYPE, "application/json")], body).into_response()
}

#[cfg(test)]
mod tests {
    use provisio_application::{ProvisioningOutcome, ResolutionError, ValidationError};

    use super::envelope_for;

    #[test]
    fn created_outcome_reports_binding_count() {
        let envelope = envelope_for(&ProvisioningOutcome::Created {
            project_name: "demo".to_owned(),
            binding_count: 2,
        });

        assert!(envelope.success);
        assert_eq!(
            envelope.message,
            "Project 'demo' created successfully with 2 user role assignments"
        );
    }

    #[test]
    fn unresolved_users_are_listed_one_per_bullet() {
        let envelope = envelope_for(&ProvisioningOutcome::UnresolvedUsers {
            project_name: "demo".to_owned(),
            errors: vec![
                ResolutionError::NotFound {
                    email: "x@b.com".to_owned(),
                },
                ResolutionError::LookupFailed {
                    email: "y@b.com".to_owned(),
                    message: "timeout".to_owned(),
                },
            ],
        });

        assert!(!envelope.success);
        assert_eq!(
            envelope.message,
            "Failed to create project 'demo' because some users could not be found:\n\
             • User with email 'x@b.com' not found in the directory\n\
             • Error retrieving user 'y@b.com': timeout"
        );
    }

    #[test]
    fn failures_are_never_successful() {
        let outcomes = [
            ProvisioningOutcome::Invalid(ValidationError::NoUserGroups),
            ProvisioningOutcome::NotConfigured {
                reason: "missing".to_owned(),
            },
            ProvisioningOutcome::AlreadyExists {
                project_name: "demo".to_owned(),
            },
            ProvisioningOutcome::StoreFailed {
                message: "boom".to_owned(),
            },
        ];

        for outcome in &outcomes {
            assert!(!envelope_for(outcome).success);
        }
        assert_eq!(
            envelope_for(&outcomes[2]).message,
            "Project 'demo' already exists"
        );
        assert_eq!(
            envelope_for(&outcomes[3]).message,
            "Failed to create project and assign roles: boom"
        );
    }
}
