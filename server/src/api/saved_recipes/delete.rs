use crate::api::session::SessionOwner;
use crate::api::{error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Remove a saved recipe from the current session
#[utoipa::path(
    delete,
    path = "/api/saved-recipes/{recipe_id}",
    tag = "saved-recipes",
    params(
        ("recipe_id" = String, Path, description = "Id of the saved search result")
    ),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Missing session id", body = ErrorResponse),
        (status = 404, description = "Not saved", body = ErrorResponse)
    ),
    security(
        ("session_id" = [])
    )
)]
pub async fn delete_saved_recipe(
    SessionOwner(owner): SessionOwner,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> impl IntoResponse {
    match state.saved.delete(&owner, &recipe_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Recipe not saved"),
        Err(e) => {
            tracing::error!(error = %e, "failed to delete saved recipe");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete saved recipe")
        }
    }
}
