use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::dto::CreateProjectRequest;
use crate::reporter;
use crate::state::AppState;

pub async fn create_project_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return reporter::respond(reporter::malformed_request(&rejection)),
    };

    let request_id = Uuid::new_v4();
    let span = info_span!(
        "create_project",
        %request_id,
        project = payload.app_id.as_str()
    );

    let outcome = state
        .provisioning_service
        .create_project(payload.into())
        .instrument(span.clone())
        .await;

    span.in_scope(|| reporter::respond(reporter::envelope_for(&outcome)))
}
