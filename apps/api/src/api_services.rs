use std::sync::Arc;

use provisio_application::{ControlPlane, ControlPlaneAccess, ProvisioningService};
use provisio_core::AppError;
use provisio_infrastructure::{
    HttpControlPlaneClient, HttpControlPlaneConfig, InMemoryControlPlane, SystemClock,
};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, CLIENT_ID_ENV, CLIENT_SECRET_ENV, ControlPlaneProviderConfig};
use crate::state::AppState;

pub fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let control_plane = build_control_plane_access(&config.control_plane)?;

    Ok(AppState {
        provisioning_service: ProvisioningService::new(
            control_plane,
            Arc::new(SystemClock),
            config.request_timeout,
        ),
    })
}

/// Turns provider configuration into control-plane access.
///
/// Missing credentials or a client that fails to initialize are not startup
/// errors: every request reports the reason instead.
pub fn build_control_plane_access(
    config: &ControlPlaneProviderConfig,
) -> Result<ControlPlaneAccess, AppError> {
    match config {
        ControlPlaneProviderConfig::InMemory { seed_users } => {
            let control_plane = InMemoryControlPlane::from_seed(seed_users)?;
            info!("using in-memory control plane");
            Ok(ControlPlaneAccess::Ready(ControlPlane::from_adapter(
                Arc::new(control_plane),
            )))
        }
        ControlPlaneProviderConfig::Http {
            base_url,
            credentials,
            skip_tls_verify,
        } => {
            if *skip_tls_verify {
                warn!("SSL certificate verification is DISABLED (CONTROL_PLANE_SKIP_TLS_VERIFY=true)");
            }

            let Some(credentials) = credentials else {
                warn!("control plane credentials are missing; create-project requests will fail");
                return Ok(ControlPlaneAccess::Unavailable(format!(
                    "Missing control plane credentials. Set {CLIENT_ID_ENV} and {CLIENT_SECRET_ENV} environment variables."
                )));
            };

            let client = HttpControlPlaneClient::new(HttpControlPlaneConfig {
                base_url: base_url.clone(),
                client_id: credentials.client_id.clone(),
                client_secret: credentials.client_secret.clone(),
                skip_tls_verify: *skip_tls_verify,
            });

            Ok(match client {
                Ok(client) => ControlPlaneAccess::Ready(ControlPlane::from_adapter(Arc::new(client))),
                Err(error) => ControlPlaneAccess::Unavailable(error.message().to_owned()),
            })
        }
    }
}
