//! Provider clients: one per external recipe source.
//!
//! Each client knows how to build its source's query and parse the raw
//! response into [`RawItem`]s. Turning those into [`crate::UnifiedRecipe`]s
//! is the mapper's job.

mod edamam;
mod rakuten;
mod spoonacular;
mod themealdb;

pub use edamam::{EdamamProvider, EdamamRecipe, EDAMAM_BASE_URL};
pub use rakuten::{RakutenProvider, RakutenRecipe, RakutenSnapshot};
pub use spoonacular::{SpoonacularProvider, SpoonacularRecipe, SPOONACULAR_BASE_URL};
pub use themealdb::{MealDbMeal, TheMealDbProvider, INGREDIENT_SLOTS, THEMEALDB_BASE_URL};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::http::HttpClient;
use crate::types::Source;

/// An untransformed hit from one provider.
#[derive(Debug, Clone)]
pub enum RawItem {
    TheMealDb(MealDbMeal),
    Spoonacular(SpoonacularRecipe),
    Edamam(EdamamRecipe),
    Rakuten(RakutenRecipe),
}

impl RawItem {
    pub fn source(&self) -> Source {
        match self {
            RawItem::TheMealDb(_) => Source::TheMealDb,
            RawItem::Spoonacular(_) => Source::Spoonacular,
            RawItem::Edamam(_) => Source::Edamam,
            RawItem::Rakuten(_) => Source::Rakuten,
        }
    }
}

/// A single external recipe source.
///
/// "No results" is an empty vector, never an error.
#[async_trait]
pub trait RecipeProvider: Send + Sync {
    fn source(&self) -> Source;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawItem>, ProviderError>;
}

/// Read a credential from the environment, treating blanks and the
/// sample-config placeholders as absent.
pub fn credential_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().and_then(|v| usable_credential(&v))
}

pub(crate) fn usable_credential(value: &str) -> Option<String> {
    let value = value.trim();
    let placeholder = value.is_empty() || (value.starts_with("your_") && value.ends_with("_here"));
    (!placeholder).then(|| value.to_string())
}

/// Decode a list of items one by one so a single odd hit cannot sink the
/// whole response.
pub(crate) fn decode_items<T: DeserializeOwned>(
    source: Source,
    items: Vec<serde_json::Value>,
) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(source = %source, error = %e, "skipping undecodable item");
                None
            }
        })
        .collect()
}

/// The set of configured provider clients, keyed by source.
#[derive(Clone, Default)]
pub struct ProviderSet {
    providers: HashMap<Source, Arc<dyn RecipeProvider>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build all four clients from environment credentials. Missing
    /// credentials do not fail here; the client reports `NotConfigured`.
    pub fn from_env(http: Arc<dyn HttpClient>) -> Self {
        Self::new()
            .with(Arc::new(TheMealDbProvider::new(http.clone())))
            .with(Arc::new(SpoonacularProvider::from_env(http.clone())))
            .with(Arc::new(EdamamProvider::from_env(http.clone())))
            .with(Arc::new(RakutenProvider::from_env(http)))
    }

    /// Register (or replace) the client for its source.
    pub fn with(mut self, provider: Arc<dyn RecipeProvider>) -> Self {
        self.providers.insert(provider.source(), provider);
        self
    }

    pub fn get(&self, source: Source) -> Option<Arc<dyn RecipeProvider>> {
        self.providers.get(&source).cloned()
    }

    pub fn sources(&self) -> Vec<Source> {
        let mut sources: Vec<Source> = self.providers.keys().copied().collect();
        sources.sort();
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_not_credentials() {
        assert_eq!(usable_credential(""), None);
        assert_eq!(usable_credential("   "), None);
        assert_eq!(usable_credential("your_api_key_here"), None);
        assert_eq!(usable_credential("your_app_id_here"), None);
        assert_eq!(usable_credential(" abc123 "), Some("abc123".to_string()));
    }

    #[test]
    fn decode_items_skips_bad_entries() {
        let items = vec![
            serde_json::json!({"recipeTitle": "親子丼"}),
            serde_json::json!("not an object"),
        ];
        let decoded: Vec<RakutenRecipe> = decode_items(Source::Rakuten, items);
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn provider_set_replaces_by_source() {
        let http: Arc<dyn HttpClient> = Arc::new(crate::http::MockClient::new());
        let set = ProviderSet::new()
            .with(Arc::new(TheMealDbProvider::new(http.clone())))
            .with(Arc::new(TheMealDbProvider::new(http)));
        assert_eq!(set.sources(), vec![Source::TheMealDb]);
        assert!(set.get(Source::Rakuten).is_none());
    }
}
