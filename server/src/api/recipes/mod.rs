pub mod categories;
pub mod category;
pub mod process;
pub mod search;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(search::search_recipes))
        .route("/category-search", get(category::search_category))
        .route("/categories", get(categories::list_categories))
        .route("/process", post(process::process_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        search::search_recipes,
        category::search_category,
        categories::list_categories,
        process::process_recipe,
    ),
    components(schemas(
        larder_core::KeywordSearchResponse,
        larder_core::CategorySearchResponse,
        larder_core::UnifiedRecipe,
        larder_core::EnrichedRecipe,
        larder_core::EnrichedIngredient,
        larder_core::Step,
        larder_core::Source,
        larder_core::SourceError,
        larder_core::CategoryInfo,
        categories::CategoriesResponse,
        process::ProcessRecipeRequest,
    ))
)]
pub struct ApiDoc;
