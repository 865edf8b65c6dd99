use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use larder_core::CategoryInfo;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}

/// List the searchable categories and their keyword expansions
#[utoipa::path(
    get,
    path = "/api/recipes/categories",
    tag = "recipes",
    responses(
        (status = 200, description = "All categories", body = CategoriesResponse)
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    Json(CategoriesResponse {
        categories: state.recipes.categories(),
    })
}
