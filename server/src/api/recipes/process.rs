use crate::api::{json_rejection_response, request_error_response, ErrorResponse};
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, response::IntoResponse, Json};
use larder_core::{EnrichedRecipe, UnifiedRecipe};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessRecipeRequest {
    pub recipe: UnifiedRecipe,
}

/// Expand a search result into steps, costs and nutrition
///
/// Results are cached per recipe title. When the model is unavailable the
/// response is a reduced recipe that links to the original page.
#[utoipa::path(
    post,
    path = "/api/recipes/process",
    tag = "recipes",
    request_body = ProcessRecipeRequest,
    responses(
        (status = 200, description = "Enriched recipe", body = EnrichedRecipe),
        (status = 400, description = "Recipe without id or title", body = ErrorResponse)
    )
)]
pub async fn process_recipe(
    State(state): State<AppState>,
    body: Result<Json<ProcessRecipeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(&rejection),
    };

    match state.recipes.enrich(&request.recipe).await {
        Ok(enriched) => Json(enriched).into_response(),
        Err(e) => request_error_response(&e),
    }
}
