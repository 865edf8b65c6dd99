use crate::api::{request_error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use larder_core::types::parse_source_list;
use larder_core::KeywordSearchResponse;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Search keyword (required)
    pub q: Option<String>,
    /// Comma-separated sources to query (default: all, in priority order)
    pub sources: Option<String>,
    /// Hits requested from each source (default: 10)
    pub limit: Option<usize>,
}

/// Search every selected source for a keyword
///
/// Sources are queried concurrently. A source that fails or times out is
/// listed under `errors`; the others still contribute. Results are
/// de-duplicated by id and ordered by source priority.
#[utoipa::path(
    get,
    path = "/api/recipes/all",
    tag = "recipes",
    params(SearchParams),
    responses(
        (status = 200, description = "Merged search results", body = KeywordSearchResponse),
        (status = 400, description = "Missing query or unknown source", body = ErrorResponse)
    )
)]
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let sources = match parse_source_list(params.sources.as_deref().unwrap_or("")) {
        Ok(sources) => sources,
        Err(e) => return request_error_response(&e),
    };

    match state
        .recipes
        .search_by_keyword(params.q.as_deref().unwrap_or(""), &sources, params.limit)
        .await
    {
        Ok(response) => Json(response).into_response(),
        Err(e) => request_error_response(&e),
    }
}
