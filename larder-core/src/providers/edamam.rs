//! Edamam Recipe Search v2. Requires `EDAMAM_APP_ID` and `EDAMAM_APP_KEY`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{credential_from_env, decode_items, usable_credential, RawItem, RecipeProvider};
use crate::error::ProviderError;
use crate::http::{build_url, redact_url, HttpClient};
use crate::lenient;
use crate::types::Source;

pub const EDAMAM_BASE_URL: &str = "https://api.edamam.com/api/recipes/v2";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdamamRecipe {
    /// `http://www.edamam.com/ontologies/edamam.owl#recipe_<id>`
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
    /// Serving count.
    #[serde(default, rename = "yield", deserialize_with = "lenient::opt_number")]
    pub servings: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub ingredient_lines: Vec<String>,
    /// Whole-recipe kcal.
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub total_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub diet_labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub health_labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub cuisine_type: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub dish_type: Vec<String>,
}

impl EdamamRecipe {
    /// The native id: the fragment after `#recipe_` in the URI.
    pub fn native_id(&self) -> Option<&str> {
        self.uri
            .as_deref()
            .and_then(|uri| uri.split_once("#recipe_"))
            .map(|(_, id)| id)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Hit {
    recipe: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Option<Vec<Hit>>,
}

pub struct EdamamProvider {
    http: Arc<dyn HttpClient>,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl EdamamProvider {
    pub fn new(http: Arc<dyn HttpClient>, app_id: Option<String>, app_key: Option<String>) -> Self {
        let app_id = app_id.as_deref().and_then(usable_credential);
        let app_key = app_key.as_deref().and_then(usable_credential);
        Self {
            http,
            base_url: EDAMAM_BASE_URL.to_string(),
            credentials: app_id.zip(app_key),
        }
    }

    pub fn from_env(http: Arc<dyn HttpClient>) -> Self {
        Self::new(
            http,
            credential_from_env("EDAMAM_APP_ID"),
            credential_from_env("EDAMAM_APP_KEY"),
        )
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl RecipeProvider for EdamamProvider {
    fn source(&self) -> Source {
        Source::Edamam
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawItem>, ProviderError> {
        let Some((app_id, app_key)) = self.credentials.as_ref() else {
            return Err(ProviderError::not_configured(
                Source::Edamam,
                "EDAMAM_APP_ID / EDAMAM_APP_KEY not set",
            ));
        };

        let to = limit.to_string();
        let url = build_url(
            &self.base_url,
            &[
                ("type", "public"),
                ("q", query),
                ("app_id", app_id),
                ("app_key", app_key),
                ("from", "0"),
                ("to", &to),
            ],
        )
        .map_err(|e| ProviderError::unavailable(Source::Edamam, e.to_string()))?;

        tracing::debug!(url = %redact_url(&url, &[app_id.as_str(), app_key.as_str()]), "edamam search");

        let body = self
            .http
            .get_text(&url)
            .await
            .map_err(|e| ProviderError::from_fetch(Source::Edamam, e))?;

        let response: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::malformed(Source::Edamam, e.to_string()))?;

        let recipes: Vec<EdamamRecipe> = decode_items(
            Source::Edamam,
            response
                .hits
                .unwrap_or_default()
                .into_iter()
                .map(|hit| hit.recipe)
                .collect(),
        );

        Ok(recipes
            .into_iter()
            .take(limit)
            .map(RawItem::Edamam)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;

    #[test]
    fn native_id_comes_from_uri_fragment() {
        let recipe = EdamamRecipe {
            uri: Some("http://www.edamam.com/ontologies/edamam.owl#recipe_b79327d0".into()),
            ..Default::default()
        };
        assert_eq!(recipe.native_id(), Some("b79327d0"));

        let recipe = EdamamRecipe {
            uri: Some("http://www.edamam.com/ontologies/edamam.owl".into()),
            ..Default::default()
        };
        assert_eq!(recipe.native_id(), None);
    }

    #[tokio::test]
    async fn needs_both_credentials() {
        let http = Arc::new(MockClient::new());
        let provider = EdamamProvider::new(http, Some("id".into()), None);
        assert!(provider.search("chicken", 5).await.unwrap_err().is_not_configured());
    }

    #[tokio::test]
    async fn hits_are_unwrapped() {
        let body = r#"{"from": 1, "to": 1, "count": 1, "hits": [{"recipe": {"uri": "x#recipe_abc", "label": "Chicken Vesuvio"}}]}"#;
        let http = Arc::new(MockClient::new().with_body(EDAMAM_BASE_URL, body));
        let provider = EdamamProvider::new(http, Some("id".into()), Some("key".into()));
        let items = provider.search("chicken", 5).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source(), Source::Edamam);
    }
}
