use std::env;
use std::time::Duration;

use provisio_application::DEFAULT_REQUEST_TIMEOUT;
use provisio_core::AppError;
use url::Url;

const DEFAULT_CONTROL_PLANE_URL: &str = "https://app.nobl9.com";

/// Environment variable holding the control-plane client identifier.
pub const CLIENT_ID_ENV: &str = "CONTROL_PLANE_CLIENT_ID";

/// Environment variable holding the control-plane client secret.
pub const CLIENT_SECRET_ENV: &str = "CONTROL_PLANE_CLIENT_SECRET";

#[derive(Clone)]
pub struct ControlPlaneCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ControlPlaneCredentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ControlPlaneCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum ControlPlaneProviderConfig {
    Http {
        base_url: Url,
        credentials: Option<ControlPlaneCredentials>,
        skip_tls_verify: bool,
    },
    InMemory {
        seed_users: String,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: Option<String>,
    pub request_timeout: Duration,
    pub control_plane: ControlPlaneProviderConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_host = non_empty("API_HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let api_port = non_empty("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(4000);
        let frontend_url = non_empty("FRONTEND_URL");
        let request_timeout = non_empty("REQUEST_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|seconds| *seconds > 0)
            .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);

        let control_plane = match non_empty("CONTROL_PLANE_PROVIDER")
            .unwrap_or_else(|| "http".to_owned())
            .as_str()
        {
            "http" => {
                let raw_url = non_empty("CONTROL_PLANE_URL")
                    .unwrap_or_else(|| DEFAULT_CONTROL_PLANE_URL.to_owned());
                let base_url = Url::parse(raw_url.trim()).map_err(|error| {
                    AppError::Validation(format!("invalid CONTROL_PLANE_URL '{raw_url}': {error}"))
                })?;
                let credentials = non_empty(CLIENT_ID_ENV)
                    .zip(non_empty(CLIENT_SECRET_ENV))
                    .map(|(client_id, client_secret)| ControlPlaneCredentials {
                        client_id,
                        client_secret,
                    });
                let skip_tls_verify = lookup("CONTROL_PLANE_SKIP_TLS_VERIFY")
                    .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));

                ControlPlaneProviderConfig::Http {
                    base_url,
                    credentials,
                    skip_tls_verify,
                }
            }
            "memory" => ControlPlaneProviderConfig::InMemory {
                seed_users: lookup("CONTROL_PLANE_SEED_USERS").unwrap_or_default(),
            },
            other => {
                return Err(AppError::Validation(format!(
                    "CONTROL_PLANE_PROVIDER must be either 'http' or 'memory', got '{other}'"
                )));
            }
        };

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            request_timeout,
            control_plane,
        })
    }
}
