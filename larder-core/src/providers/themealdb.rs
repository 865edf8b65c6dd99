//! TheMealDB: free, keyless, English.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{decode_items, RawItem, RecipeProvider};
use crate::error::ProviderError;
use crate::http::{build_url, HttpClient};
use crate::lenient;
use crate::types::Source;

pub const THEMEALDB_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1/search.php";

/// Number of parallel ingredient/measure slots on a meal.
pub const INGREDIENT_SLOTS: usize = 20;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDbMeal {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id_meal: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub str_meal: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub str_meal_thumb: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub str_source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub str_category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub str_area: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub str_instructions: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub str_tags: Option<String>,
    /// `strIngredientN` / `strMeasureN` and anything else we don't model.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl MealDbMeal {
    /// The `(measure, ingredient)` pair in slot `n` (1-based).
    pub fn slot(&self, n: usize) -> (Option<&str>, Option<&str>) {
        let get = |key: String| {
            self.extra
                .get(&key)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };
        (get(format!("strMeasure{n}")), get(format!("strIngredient{n}")))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    meals: Option<Vec<serde_json::Value>>,
}

pub struct TheMealDbProvider {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl TheMealDbProvider {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            base_url: THEMEALDB_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl RecipeProvider for TheMealDbProvider {
    fn source(&self) -> Source {
        Source::TheMealDb
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawItem>, ProviderError> {
        let url = build_url(&self.base_url, &[("s", query)])
            .map_err(|e| ProviderError::unavailable(Source::TheMealDb, e.to_string()))?;

        let body = self
            .http
            .get_text(&url)
            .await
            .map_err(|e| ProviderError::from_fetch(Source::TheMealDb, e))?;

        let response: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::malformed(Source::TheMealDb, e.to_string()))?;

        // `"meals": null` is how TheMealDB says "no results".
        let meals: Vec<MealDbMeal> =
            decode_items(Source::TheMealDb, response.meals.unwrap_or_default());

        Ok(meals
            .into_iter()
            .take(limit)
            .map(RawItem::TheMealDb)
            .collect())
    }
}
