use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use provisio_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(app_state: AppState, frontend_url: Option<&str>) -> Result<Router, AppError> {
    let cors_layer = match frontend_url {
        Some(frontend_url) => CorsLayer::new()
            .allow_origin(HeaderValue::from_str(frontend_url).map_err(|error| {
                AppError::Validation(format!("invalid FRONTEND_URL: {error}"))
            })?)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]),
        None => CorsLayer::permissive(),
    };

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/create-project",
            post(handlers::projects::create_project_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
