use crate::api::session::SessionOwner;
use crate::api::{error_response, json_rejection_response, request_error_response, ErrorResponse};
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, response::IntoResponse, Json};
use larder_core::store::{SavedRecipe, SavedRecipeError};
use larder_core::{RequestError, UnifiedRecipe};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveRecipeRequest {
    pub recipe: UnifiedRecipe,
}

/// Save a search result for the current session
#[utoipa::path(
    post,
    path = "/api/saved-recipes",
    tag = "saved-recipes",
    request_body = SaveRecipeRequest,
    responses(
        (status = 201, description = "Recipe saved", body = SavedRecipe),
        (status = 400, description = "Recipe without id", body = ErrorResponse),
        (status = 401, description = "Missing session id", body = ErrorResponse),
        (status = 409, description = "Already saved", body = ErrorResponse)
    ),
    security(
        ("session_id" = [])
    )
)]
pub async fn save_recipe(
    SessionOwner(owner): SessionOwner,
    State(state): State<AppState>,
    body: Result<Json<SaveRecipeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(&rejection),
    };

    if request.recipe.id.trim().is_empty() {
        return request_error_response(&RequestError::MissingField("id"));
    }

    match state.saved.save(&owner, request.recipe).await {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(e @ SavedRecipeError::AlreadySaved(_)) => {
            error_response(StatusCode::CONFLICT, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to save recipe");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save recipe")
        }
    }
}
