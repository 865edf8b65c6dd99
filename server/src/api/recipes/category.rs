use crate::api::{request_error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use larder_core::{CategorySearchResponse, RequestError};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct CategorySearchParams {
    /// Category name from /api/recipes/categories
    pub category: Option<String>,
    /// 1-based page number (default: 1)
    pub page: Option<usize>,
}

/// Search every keyword of a category and return one page of the merged result
#[utoipa::path(
    get,
    path = "/api/recipes/category-search",
    tag = "recipes",
    params(CategorySearchParams),
    responses(
        (status = 200, description = "One page of category results", body = CategorySearchResponse),
        (status = 400, description = "Missing category or invalid page", body = ErrorResponse),
        (status = 404, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn search_category(
    State(state): State<AppState>,
    Query(params): Query<CategorySearchParams>,
) -> impl IntoResponse {
    let Some(category) = params.category.filter(|c| !c.trim().is_empty()) else {
        return request_error_response(&RequestError::MissingField("category"));
    };

    match state
        .recipes
        .search_by_category(&category, params.page.unwrap_or(1))
        .await
    {
        Ok(response) => Json(response).into_response(),
        Err(e) => request_error_response(&e),
    }
}
