pub mod delete;
pub mod list;
pub mod save;

use crate::AppState;
use axum::routing::{delete, get};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/saved-recipes endpoints (mounted at /api/saved-recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_saved_recipes).post(save::save_recipe))
        .route("/{recipe_id}", delete(delete::delete_saved_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        save::save_recipe,
        list::list_saved_recipes,
        delete::delete_saved_recipe,
    ),
    components(schemas(
        larder_core::store::SavedRecipe,
        save::SaveRecipeRequest,
        list::SavedRecipesResponse,
    ))
)]
pub struct ApiDoc;
