use crate::api::session::SessionOwner;
use crate::api::{error_response, ErrorResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use larder_core::store::SavedRecipe;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct SavedRecipesResponse {
    /// Newest first
    pub recipes: Vec<SavedRecipe>,
}

/// List the current session's saved recipes
#[utoipa::path(
    get,
    path = "/api/saved-recipes",
    tag = "saved-recipes",
    responses(
        (status = 200, description = "Saved recipes, newest first", body = SavedRecipesResponse),
        (status = 401, description = "Missing session id", body = ErrorResponse)
    ),
    security(
        ("session_id" = [])
    )
)]
pub async fn list_saved_recipes(
    SessionOwner(owner): SessionOwner,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.saved.list(&owner).await {
        Ok(recipes) => Json(SavedRecipesResponse { recipes }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to list saved recipes");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list saved recipes")
        }
    }
}
