pub mod chat;
pub mod recipes;
pub mod saved_recipes;
pub mod session;


use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use larder_core::RequestError;
use serde::Serialize;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

use crate::telemetry;
use crate::AppState;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Caller mistakes: an unknown category is 404, everything else 400.
pub fn request_error_response(err: &RequestError) -> Response {
    let status = match err {
        RequestError::UnknownCategory(_) => StatusCode::NOT_FOUND,
        RequestError::MissingField(_)
        | RequestError::UnknownSource(_)
        | RequestError::InvalidPage => StatusCode::BAD_REQUEST,
    };
    error_response(status, err.to_string())
}

/// Unreadable or incomplete JSON bodies are a 400 like any other caller
/// mistake.
pub fn json_rejection_response(rejection: &JsonRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// All API routes, with state applied. The provider call counter itself is
/// scoped by the caller, outside any tracing layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/recipes", recipes::router())
        .nest("/api/saved-recipes", saved_recipes::router())
        .nest("/api/chat", chat::router())
        .with_state(state)
        .layer(middleware::from_fn(
            telemetry::provider_call_count_header_middleware,
        ))
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(components(schemas(ErrorResponse)))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "session_id",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(session::SESSION_HEADER))),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        recipes::ApiDoc::openapi(),
        saved_recipes::ApiDoc::openapi(),
        chat::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
