use provisio_application::{CreateProjectInput, UserGroupInput};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Incoming payload for project creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-project-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(
        default,
        rename = "appID",
        alias = "appId",
        deserialize_with = "null_as_default"
    )]
    pub app_id: String,
    #[serde(default)]
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_groups: Vec<UserGroupRequest>,
}

/// One group of users sharing a role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-group-request.ts"
)]
pub struct UserGroupRequest {
    /// Comma-separated emails or user identifiers.
    #[serde(
        default,
        rename = "userIDs",
        alias = "userIds",
        deserialize_with = "null_as_default"
    )]
    pub user_ids: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
}

/// Uniform result envelope returned by every create-project call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/response-envelope.ts"
)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub message: String,
}

/// Reads an explicit `null` the same way as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<CreateProjectRequest> for CreateProjectInput {
    fn from(value: CreateProjectRequest) -> Self {
        Self {
            app_id: value.app_id,
            description: value.description,
            user_groups: value
                .user_groups
                .into_iter()
                .map(UserGroupInput::from)
                .collect(),
        }
    }
}

impl From<UserGroupRequest> for UserGroupInput {
    fn from(value: UserGroupRequest) -> Self {
        Self {
            user_ids: value.user_ids,
            role: value.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use provisio_application::CreateProjectInput;

    use super::CreateProjectRequest;

    #[test]
    fn request_accepts_browser_field_spellings() {
        let parsed = serde_json::from_str::<CreateProjectRequest>(
            r#"{"appId":"demo","userGroups":[{"userIds":"a@b.com","role":"project-owner"}]}"#,
        );

        let Ok(parsed) = parsed else {
            panic!("request must parse");
        };
        let input = CreateProjectInput::from(parsed);
        assert_eq!(input.app_id, "demo");
        assert_eq!(input.description, None);
        assert_eq!(input.user_groups.len(), 1);
        assert_eq!(input.user_groups[0].user_ids, "a@b.com");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let parsed = serde_json::from_str::<CreateProjectRequest>("{}");

        let Ok(parsed) = parsed else {
            panic!("empty object must parse");
        };
        assert!(parsed.app_id.is_empty());
        assert!(parsed.user_groups.is_empty());
    }

    #[test]
    fn null_fields_read_as_empty() {
        let parsed = serde_json::from_str::<CreateProjectRequest>(
            r#"{"appID":null,"userGroups":[{"userIDs":null,"role":null}]}"#,
        );

        let Ok(parsed) = parsed else {
            panic!("null fields must parse");
        };
        assert!(parsed.app_id.is_empty());
        assert_eq!(parsed.user_groups.len(), 1);
        assert!(parsed.user_groups[0].user_ids.is_empty());
        assert!(parsed.user_groups[0].role.is_empty());

        let without_groups =
            serde_json::from_str::<CreateProjectRequest>(r#"{"appID":"demo","userGroups":null}"#);
        assert!(without_groups.is_ok_and(|request| request.user_groups.is_empty()));
    }
}
