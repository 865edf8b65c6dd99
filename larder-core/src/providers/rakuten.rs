//! Rakuten Recipe, served from a snapshot of the category rankings.
//!
//! The snapshot is a JSON document keyed by large category, each holding
//! either a list of recipes or a map of medium category to recipes. It is
//! loaded once per process from `LARDER_RAKUTEN_SNAPSHOT_URL` (an http(s)
//! URL or a local path).

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;

use super::{decode_items, RawItem, RecipeProvider};
use crate::error::ProviderError;
use crate::http::HttpClient;
use crate::lenient;
use crate::types::Source;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RakutenRecipe {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub recipe_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub recipe_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub food_image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub recipe_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub recipe_material: Vec<String>,
    /// Free text such as `"約15分"`.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub recipe_indication: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub recipe_cost: Option<String>,
    /// Filled from the snapshot key when the item itself doesn't say.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category_name: Option<String>,
}

impl RakutenRecipe {
    /// First integer in `recipeIndication`, read as minutes.
    pub fn minutes(&self) -> Option<u32> {
        let text = self.recipe_indication.as_deref()?;
        let digits: String = text
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }

    fn identity(&self) -> Option<&str> {
        self.recipe_id.as_deref().or(self.recipe_url.as_deref())
    }

    fn mentions(&self, keyword: &str) -> bool {
        self.recipe_title
            .as_deref()
            .is_some_and(|title| title.contains(keyword))
            || self.recipe_material.iter().any(|m| m.contains(keyword))
    }
}

#[derive(Debug, Clone)]
struct Entry {
    large: String,
    medium: Option<String>,
    recipe: RakutenRecipe,
}

/// Parsed snapshot, flattened in category-key order.
#[derive(Debug, Clone, Default)]
pub struct RakutenSnapshot {
    entries: Vec<Entry>,
}

impl RakutenSnapshot {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let document: serde_json::Map<String, Value> = serde_json::from_str(json)?;
        let mut entries = Vec::new();

        for (large, body) in document {
            match body {
                Value::Array(items) => {
                    entries.extend(Self::entries(&large, None, items));
                }
                Value::Object(mediums) => {
                    for (medium, items) in mediums {
                        let Value::Array(items) = items else {
                            tracing::warn!(category = %medium, "skipping non-list snapshot category");
                            continue;
                        };
                        entries.extend(Self::entries(&large, Some(&medium), items));
                    }
                }
                _ => tracing::warn!(category = %large, "skipping non-list snapshot category"),
            }
        }

        Ok(Self { entries })
    }

    fn entries(large: &str, medium: Option<&str>, items: Vec<Value>) -> Vec<Entry> {
        decode_items::<RakutenRecipe>(Source::Rakuten, items)
            .into_iter()
            .map(|mut recipe| {
                if recipe.category_name.is_none() {
                    recipe.category_name = Some(medium.unwrap_or(large).to_string());
                }
                Entry {
                    large: large.to_string(),
                    medium: medium.map(str::to_string),
                    recipe,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recipes of the category named `keyword`; failing that, recipes whose
    /// title or materials mention it. Repeats across categories collapse.
    pub fn search(&self, keyword: &str, limit: usize) -> Vec<RakutenRecipe> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Vec::new();
        }

        let in_category = |e: &&Entry| e.large == keyword || e.medium.as_deref() == Some(keyword);
        let by_category: Vec<&Entry> = self.entries.iter().filter(in_category).collect();
        let matches = if by_category.is_empty() {
            self.entries
                .iter()
                .filter(|e| e.recipe.mentions(keyword))
                .collect()
        } else {
            by_category
        };

        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for entry in matches {
            if hits.len() >= limit {
                break;
            }
            if let Some(id) = entry.recipe.identity() {
                if !seen.insert(id) {
                    continue;
                }
            }
            hits.push(entry.recipe.clone());
        }
        hits
    }
}

pub struct RakutenProvider {
    http: Arc<dyn HttpClient>,
    location: Option<String>,
    snapshot: OnceCell<Arc<RakutenSnapshot>>,
}

impl RakutenProvider {
    pub fn new(http: Arc<dyn HttpClient>, location: Option<String>) -> Self {
        Self {
            http,
            location: location.filter(|l| !l.trim().is_empty()),
            snapshot: OnceCell::new(),
        }
    }

    pub fn from_env(http: Arc<dyn HttpClient>) -> Self {
        Self::new(http, std::env::var("LARDER_RAKUTEN_SNAPSHOT_URL").ok())
    }

    /// A provider over an already-loaded snapshot.
    pub fn with_snapshot(http: Arc<dyn HttpClient>, snapshot: RakutenSnapshot) -> Self {
        Self {
            http,
            location: None,
            snapshot: OnceCell::new_with(Some(Arc::new(snapshot))),
        }
    }

    async fn snapshot(&self) -> Result<Arc<RakutenSnapshot>, ProviderError> {
        self.snapshot
            .get_or_try_init(|| async {
                let Some(location) = self.location.as_deref() else {
                    return Err(ProviderError::not_configured(
                        Source::Rakuten,
                        "LARDER_RAKUTEN_SNAPSHOT_URL not set",
                    ));
                };
                let body = self.load(location).await?;
                let snapshot = RakutenSnapshot::parse(&body)
                    .map_err(|e| ProviderError::malformed(Source::Rakuten, e.to_string()))?;
                tracing::info!(recipes = snapshot.len(), "loaded rakuten snapshot");
                Ok(Arc::new(snapshot))
            })
            .await
            .cloned()
    }

    async fn load(&self, location: &str) -> Result<String, ProviderError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            return self
                .http
                .get_text(location)
                .await
                .map_err(|e| ProviderError::from_fetch(Source::Rakuten, e));
        }

        let path = location.strip_prefix("file://").unwrap_or(location);
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ProviderError::unavailable(Source::Rakuten, format!("{path}: {e}")))
    }
}

#[async_trait]
impl RecipeProvider for RakutenProvider {
    fn source(&self) -> Source {
        Source::Rakuten
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawItem>, ProviderError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .search(query, limit)
            .into_iter()
            .map(RawItem::Rakuten)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;

    const SNAPSHOT: &str = r#"{
        "肉料理": {
            "鶏肉": [
                {"recipeId": 1, "recipeTitle": "照り焼きチキン", "recipeMaterial": ["鶏もも肉", "醤油"], "recipeIndication": "約15分"},
                {"recipeId": 2, "recipeTitle": "唐揚げ", "recipeMaterial": ["鶏もも肉", "片栗粉"]}
            ],
            "豚肉": [
                {"recipeId": 3, "recipeTitle": "生姜焼き", "recipeMaterial": ["豚ロース", "生姜"]}
            ]
        },
        "人気": [
            {"recipeId": 1, "recipeTitle": "照り焼きチキン", "recipeMaterial": ["鶏もも肉", "醤油"]},
            {"recipeId": 4, "recipeTitle": "親子丼", "recipeMaterial": ["鶏もも肉", "卵"]}
        ]
    }"#;

    #[test]
    fn minutes_reads_first_integer() {
        let recipe = RakutenRecipe {
            recipe_indication: Some("約15分".into()),
            ..Default::default()
        };
        assert_eq!(recipe.minutes(), Some(15));

        let recipe = RakutenRecipe {
            recipe_indication: Some("1時間以上".into()),
            ..Default::default()
        };
        assert_eq!(recipe.minutes(), Some(1));

        assert_eq!(RakutenRecipe::default().minutes(), None);
    }

    #[test]
    fn category_name_wins_over_text_match() {
        let snapshot = RakutenSnapshot::parse(SNAPSHOT).unwrap();
        assert_eq!(snapshot.len(), 5);

        let hits = snapshot.search("肉料理", 10);
        assert_eq!(hits.len(), 3);
        assert!(hits
            .iter()
            .all(|r| matches!(r.category_name.as_deref(), Some("鶏肉") | Some("豚肉"))));

        let hits = snapshot.search("豚肉", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].recipe_title.as_deref(), Some("生姜焼き"));
    }

    #[test]
    fn text_match_collapses_repeats() {
        let snapshot = RakutenSnapshot::parse(SNAPSHOT).unwrap();
        let hits = snapshot.search("鶏もも肉", 10);
        let ids: Vec<_> = hits.iter().filter_map(|r| r.recipe_id.as_deref()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.iter().filter(|id| **id == "1").count(), 1);

        assert_eq!(snapshot.search("鶏もも肉", 2).len(), 2);
        assert!(snapshot.search("  ", 10).is_empty());
    }

    #[tokio::test]
    async fn unset_location_is_not_configured() {
        let provider = RakutenProvider::new(Arc::new(MockClient::new()), None);
        assert!(provider.search("鶏肉", 10).await.unwrap_err().is_not_configured());
    }

    #[tokio::test]
    async fn snapshot_is_fetched_once() {
        let url = "https://snapshots.test/recipes.json";
        let http = Arc::new(MockClient::new().with_body(url, SNAPSHOT));
        let provider = RakutenProvider::new(http.clone(), Some(url.to_string()));

        assert_eq!(provider.search("鶏肉", 10).await.unwrap().len(), 2);
        assert_eq!(provider.search("人気", 10).await.unwrap().len(), 2);
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_retried() {
        let url = "https://snapshots.test/recipes.json";
        let http = Arc::new(MockClient::new().with_status(url, 503));
        let provider = RakutenProvider::new(http.clone(), Some(url.to_string()));

        assert!(provider.search("鶏肉", 10).await.is_err());
        assert!(provider.search("鶏肉", 10).await.is_err());
        assert_eq!(http.requests().len(), 2);
    }

    #[tokio::test]
    async fn loads_from_local_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let provider = RakutenProvider::new(
            Arc::new(MockClient::new()),
            Some(format!("file://{}", path.display())),
        );
        assert_eq!(provider.search("豚肉", 10).await.unwrap().len(), 1);
    }
}
