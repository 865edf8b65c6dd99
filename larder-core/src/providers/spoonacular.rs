//! Spoonacular complexSearch. Requires `SPOONACULAR_API_KEY`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{credential_from_env, decode_items, usable_credential, RawItem, RecipeProvider};
use crate::error::ProviderError;
use crate::http::{build_url, redact_url, HttpClient};
use crate::lenient;
use crate::types::Source;

pub const SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com/recipes/complexSearch";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoonacularRecipe {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub spoonacular_source_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub ready_in_minutes: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub servings: Option<f64>,
    #[serde(default)]
    pub extended_ingredients: Option<Vec<SpoonacularIngredient>>,
    #[serde(default)]
    pub nutrition: Option<SpoonacularNutrition>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub dish_types: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub cuisines: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub diets: Vec<String>,
    #[serde(default)]
    pub vegan: Option<bool>,
    #[serde(default)]
    pub vegetarian: Option<bool>,
    #[serde(default)]
    pub gluten_free: Option<bool>,
    #[serde(default)]
    pub dairy_free: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpoonacularIngredient {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub unit: Option<String>,
    #[serde(default)]
    pub measures: Option<SpoonacularMeasures>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpoonacularMeasures {
    #[serde(default)]
    pub metric: Option<SpoonacularMeasure>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoonacularMeasure {
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub unit_short: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpoonacularNutrition {
    #[serde(default)]
    pub nutrients: Vec<SpoonacularNutrient>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpoonacularNutrient {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<serde_json::Value>>,
}

pub struct SpoonacularProvider {
    http: Arc<dyn HttpClient>,
    base_url: String,
    api_key: Option<String>,
}

impl SpoonacularProvider {
    pub fn new(http: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: SPOONACULAR_BASE_URL.to_string(),
            api_key: api_key.as_deref().and_then(usable_credential),
        }
    }

    pub fn from_env(http: Arc<dyn HttpClient>) -> Self {
        Self::new(http, credential_from_env("SPOONACULAR_API_KEY"))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl RecipeProvider for SpoonacularProvider {
    fn source(&self) -> Source {
        Source::Spoonacular
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawItem>, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ProviderError::not_configured(
                Source::Spoonacular,
                "SPOONACULAR_API_KEY not set",
            ));
        };

        let number = limit.to_string();
        let url = build_url(
            &self.base_url,
            &[
                ("apiKey", api_key),
                ("query", query),
                ("number", &number),
                ("offset", "0"),
                ("addRecipeInformation", "true"),
                ("fillIngredients", "true"),
            ],
        )
        .map_err(|e| ProviderError::unavailable(Source::Spoonacular, e.to_string()))?;

        tracing::debug!(url = %redact_url(&url, &[api_key]), "spoonacular search");

        let body = self
            .http
            .get_text(&url)
            .await
            .map_err(|e| ProviderError::from_fetch(Source::Spoonacular, e))?;

        let response: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::malformed(Source::Spoonacular, e.to_string()))?;

        let recipes: Vec<SpoonacularRecipe> =
            decode_items(Source::Spoonacular, response.results.unwrap_or_default());

        Ok(recipes
            .into_iter()
            .take(limit)
            .map(RawItem::Spoonacular)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let http = Arc::new(MockClient::new());
        let provider = SpoonacularProvider::new(http.clone(), Some("your_api_key_here".into()));
        let err = provider.search("pasta", 10).await.unwrap_err();
        assert!(err.is_not_configured());
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn quota_exhausted_is_unavailable() {
        let http = Arc::new(MockClient::new().with_status(SPOONACULAR_BASE_URL, 402));
        let provider = SpoonacularProvider::new(http, Some("key".into()));
        let err = provider.search("pasta", 10).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable { .. }));
        assert!(err.to_string().contains("quota"));
    }

    #[tokio::test]
    async fn failure_reason_hides_the_key() {
        let http = Arc::new(MockClient::new().with_status(SPOONACULAR_BASE_URL, 500));
        let provider = SpoonacularProvider::new(http, Some("s3cret".into()));
        let err = provider.search("pasta", 10).await.unwrap_err();
        assert_eq!(err.reason(), "HTTP 500");
    }

    #[tokio::test]
    async fn query_carries_key_and_limit() {
        let http = Arc::new(MockClient::new().with_body(SPOONACULAR_BASE_URL, r#"{"results": []}"#));
        let provider = SpoonacularProvider::new(http.clone(), Some("k3y".into()));
        provider.search("carbonara", 7).await.unwrap();

        let requested = http.requests().remove(0);
        assert!(requested.contains("apiKey=k3y"));
        assert!(requested.contains("query=carbonara"));
        assert!(requested.contains("number=7"));
        assert!(requested.contains("addRecipeInformation=true"));
    }
}
