//! Federated recipe search and cached LLM enrichment.
//!
//! Searches fan out to TheMealDB, Spoonacular, Edamam and a Rakuten
//! snapshot, are normalized into [`UnifiedRecipe`]s and merged in a fixed
//! source priority. Enrichment turns one hit into an [`EnrichedRecipe`]
//! with steps and nutrition, stored once per recipe title.

pub mod aggregator;
pub mod ai;
pub mod categories;
pub mod config;
pub mod dedup;
pub mod enrichment;
pub mod error;
pub mod http;
mod lenient;
pub mod mapper;
pub mod providers;
pub mod service;
pub mod store;
pub mod types;

pub use aggregator::{Aggregator, SearchOutcome};
pub use categories::{find_category, list_categories, Category, CategoryInfo, CATEGORIES};
pub use config::SearchConfig;
pub use dedup::{merge, paginate, Page};
pub use enrichment::{EnrichmentError, EnrichmentGateway, SessionRecipeCache};
pub use error::{ConfigError, FetchError, ProviderError, RequestError};
pub use mapper::map_raw_item;
pub use service::RecipeService;
pub use types::{
    CacheEntry, CategorySearchResponse, EnrichedIngredient, EnrichedRecipe, EnrichmentRequest,
    KeywordSearchResponse, Source, SourceError, Step, UnifiedRecipe,
};
