use async_trait::async_trait;
use provisio_application::{ObjectStore, UserDirectory};
use provisio_core::{AppError, AppResult};
use provisio_domain::{ProjectDescriptor, RoleBindingDescriptor};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

const MANIFEST_API_VERSION: &str = "n9/v1alpha";

/// Connection settings for the remote control plane.
#[derive(Debug, Clone)]
pub struct HttpControlPlaneConfig {
    /// Base URL of the control-plane API.
    pub base_url: Url,
    /// OAuth client identifier used as the basic-auth user.
    pub client_id: String,
    /// OAuth client secret used as the basic-auth password.
    pub client_secret: String,
    /// Disables TLS certificate verification on outbound calls.
    pub skip_tls_verify: bool,
}

/// HTTP adapter serving both the directory and the object store ports.
pub struct HttpControlPlaneClient {
    http_client: reqwest::Client,
    base_url: Url,
    client_id: String,
    client_secret: String,
}

impl HttpControlPlaneClient {
    /// Builds a client from connection settings.
    pub fn new(config: HttpControlPlaneConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.skip_tls_verify)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to initialize control plane client: {error}"))
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
            client_id: config.client_id,
            client_secret: config.client_secret,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Validation(format!(
                    "control plane URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(self.client_id.as_str(), Some(self.client_secret.as_str()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a, S> {
    api_version: &'static str,
    kind: &'static str,
    metadata: ManifestMetadata<'a>,
    spec: S,
}

#[derive(Debug, Serialize)]
struct ManifestMetadata<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct ProjectSpec<'a> {
    description: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleBindingSpec<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
    role_ref: &'a str,
    project_ref: &'a str,
}

fn manifests(
    project: &ProjectDescriptor,
    bindings: &[RoleBindingDescriptor],
) -> AppResult<Vec<serde_json::Value>> {
    let project_manifest = Manifest {
        api_version: MANIFEST_API_VERSION,
        kind: "Project",
        metadata: ManifestMetadata {
            name: project.name().as_str(),
        },
        spec: ProjectSpec {
            description: project.description(),
        },
    };

    let mut values = Vec::with_capacity(bindings.len() + 1);
    values.push(serde_json::to_value(project_manifest).map_err(encoding_error)?);

    for binding in bindings {
        let binding_manifest = Manifest {
            api_version: MANIFEST_API_VERSION,
            kind: "RoleBinding",
            metadata: ManifestMetadata {
                name: binding.name(),
            },
            spec: RoleBindingSpec {
                user: Some(binding.user_id()),
                role_ref: binding.role().as_str(),
                project_ref: binding.project_ref(),
            },
        };
        values.push(serde_json::to_value(binding_manifest).map_err(encoding_error)?);
    }

    Ok(values)
}

fn encoding_error(error: serde_json::Error) -> AppError {
    AppError::Internal(format!("failed to encode control plane manifest: {error}"))
}

async fn response_failure(context: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned());

    match status {
        StatusCode::CONFLICT => AppError::Conflict(body),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Validation(format!(
            "{context} was refused with status {status}: {body}"
        )),
        _ => AppError::Internal(format!("{context} failed with status {status}: {body}")),
    }
}

#[async_trait]
impl UserDirectory for HttpControlPlaneClient {
    async fn find_user_id_by_email(&self, email: &str) -> AppResult<Option<String>> {
        let url = self.endpoint(&["api", "v2", "users", email])?;
        let response = self
            .authorized(self.http_client.get(url))
            .send()
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("user lookup transport error: {error}"))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(response_failure("user lookup", response).await);
        }

        let user = response
            .json::<Option<UserResponse>>()
            .await
            .map_err(|error| {
                AppError::Internal(format!("user lookup returned an invalid body: {error}"))
            })?;

        Ok(user.map(|user| user.user_id))
    }
}

#[async_trait]
impl ObjectStore for HttpControlPlaneClient {
    async fn apply(
        &self,
        project: &ProjectDescriptor,
        bindings: &[RoleBindingDescriptor],
    ) -> AppResult<()> {
        let url = self.endpoint(&["api", "apply"])?;
        let payload = manifests(project, bindings)?;
        let response = self
            .authorized(self.http_client.put(url))
            .json(&payload)
            .send()
            .await
            .map_err(|error| AppError::Unavailable(format!("apply transport error: {error}")))?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(response_failure("apply", response).await)
    }
}

#[cfg(test)]
mod tests {
    use provisio_application::{ObjectStore, UserDirectory};
    use provisio_core::AppError;
    use provisio_domain::{ProjectDescriptor, ProjectRole, RoleBindingDescriptor};
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{basic_auth, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{HttpControlPlaneClient, HttpControlPlaneConfig};

    fn client_for(server: &MockServer) -> HttpControlPlaneClient {
        let client = Url::parse(&server.uri())
            .map_err(|error| AppError::Validation(error.to_string()))
            .and_then(|base_url| {
                HttpControlPlaneClient::new(HttpControlPlaneConfig {
                    base_url,
                    client_id: "client".to_owned(),
                    client_secret: "secret".to_owned(),
                    skip_tls_verify: false,
                })
            });

        match client {
            Ok(client) => client,
            Err(error) => panic!("client init failed: {error}"),
        }
    }

    fn sample_project() -> (ProjectDescriptor, Vec<RoleBindingDescriptor>) {
        let project = ProjectDescriptor::new("demo", None);
        let binding = RoleBindingDescriptor::new(
            "assign-demo-a-b-com-g0-1700000000",
            "u1",
            ProjectRole::Owner,
            "demo",
        );
        match (project, binding) {
            (Ok(project), Ok(binding)) => (project, vec![binding]),
            _ => panic!("sample descriptors must be valid"),
        }
    }

    #[tokio::test]
    async fn lookup_resolves_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users/a@b.com"))
            .and(basic_auth("client", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "userId": "u1" })))
            .mount(&server)
            .await;

        let user_id = client_for(&server).find_user_id_by_email("a@b.com").await;

        assert_eq!(user_id.ok().flatten().as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn lookup_maps_not_found_and_null_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users/missing@b.com"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users/null@b.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
            .mount(&server)
            .await;

        let client = client_for(&server);

        assert!(matches!(
            client.find_user_id_by_email("missing@b.com").await,
            Ok(None)
        ));
        assert!(matches!(
            client.find_user_id_by_email("null@b.com").await,
            Ok(None)
        ));
    }

    #[tokio::test]
    async fn lookup_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users/a@b.com"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = client_for(&server).find_user_id_by_email("a@b.com").await;

        let Err(AppError::Internal(message)) = result else {
            panic!("expected internal error");
        };
        assert!(message.contains("boom"));
    }

    #[tokio::test]
    async fn apply_sends_project_then_bindings() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/apply"))
            .and(basic_auth("client", "secret"))
            .and(body_json(json!([
                {
                    "apiVersion": "n9/v1alpha",
                    "kind": "Project",
                    "metadata": { "name": "demo" },
                    "spec": { "description": "Project created via API: demo" }
                },
                {
                    "apiVersion": "n9/v1alpha",
                    "kind": "RoleBinding",
                    "metadata": { "name": "assign-demo-a-b-com-g0-1700000000" },
                    "spec": { "user": "u1", "roleRef": "project-owner", "projectRef": "demo" }
                }
            ])))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (project, bindings) = sample_project();
        let result = client_for(&server).apply(&project, &bindings).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn apply_conflict_maps_to_conflict_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/apply"))
            .respond_with(
                ResponseTemplate::new(409).set_body_string("project demo already exists"),
            )
            .mount(&server)
            .await;

        let (project, bindings) = sample_project();
        let result = client_for(&server).apply(&project, &bindings).await;

        assert!(matches!(result, Err(AppError::Conflict(message)) if message.contains("already exists")));
    }
}
