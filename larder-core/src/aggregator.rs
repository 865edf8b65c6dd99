//! Concurrent fan-out across providers.
//!
//! Every provider call runs concurrently and is awaited to completion
//! (settle-all); a failing or stalled provider only loses its own bucket.
//! Buckets are concatenated in the configured source priority, so the
//! result order never depends on which provider answered first.

use std::collections::BTreeMap;

use futures::future::join_all;
use tracing::Instrument;

use crate::categories::Category;
use crate::config::SearchConfig;
use crate::error::ProviderError;
use crate::mapper::map_raw_item;
use crate::providers::ProviderSet;
use crate::types::{Source, SourceError, UnifiedRecipe};

/// Result of one fan-out: buckets concatenated in priority order (not yet
/// de-duplicated) plus one entry per failed call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub recipes: Vec<UnifiedRecipe>,
    pub errors: Vec<SourceError>,
}

/// One provider call in a fan-out.
#[derive(Debug, Clone)]
struct Call {
    source: Source,
    keyword: String,
    limit: usize,
    /// Source tag reported on failure.
    tag: String,
}

#[derive(Clone)]
pub struct Aggregator {
    providers: ProviderSet,
    config: SearchConfig,
}

impl Aggregator {
    pub fn new(providers: ProviderSet, config: SearchConfig) -> Self {
        Self { providers, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Query each of `sources` once for `query`.
    pub async fn search(&self, query: &str, sources: &[Source], limit: usize) -> SearchOutcome {
        let calls = sources
            .iter()
            .map(|source| Call {
                source: *source,
                keyword: query.to_string(),
                limit,
                tag: source.to_string(),
            })
            .collect();
        self.run(calls).await
    }

    /// Query every keyword variant of `category`: the English keywords on the
    /// English sources and the Rakuten keywords on Rakuten.
    pub async fn search_category(&self, category: &Category) -> SearchOutcome {
        let limit = self.config.category_keyword_limit;
        let mut calls = Vec::new();

        for source in &self.config.priority {
            let keywords = match source {
                Source::Rakuten => category.rakuten_queries(),
                Source::TheMealDb | Source::Spoonacular | Source::Edamam => {
                    category.english_keywords.to_vec()
                }
            };
            calls.extend(keywords.into_iter().map(|keyword| Call {
                source: *source,
                keyword: keyword.to_string(),
                limit,
                tag: format!("{source}-{keyword}"),
            }));
        }

        tracing::debug!(
            category = category.name,
            calls = calls.len(),
            "category fan-out"
        );
        self.run(calls).await
    }

    async fn run(&self, calls: Vec<Call>) -> SearchOutcome {
        let settled = join_all(calls.into_iter().map(|call| async move {
            let result = self.call_provider(&call).await;
            (call, result)
        }))
        .await;

        // join_all keeps input order, so keyword order survives within a bucket.
        let mut buckets: BTreeMap<usize, Vec<UnifiedRecipe>> = BTreeMap::new();
        let mut errors: Vec<(usize, SourceError)> = Vec::new();

        for (call, result) in settled {
            let rank = self.config.rank(call.source);
            match result {
                Ok(recipes) => buckets.entry(rank).or_default().extend(recipes),
                Err(e) if e.is_not_configured() => {
                    tracing::debug!(source = %call.source, reason = e.reason(), "source not configured");
                }
                Err(e) => {
                    tracing::warn!(
                        source = %call.source,
                        keyword = %call.keyword,
                        error = %e,
                        "provider search failed"
                    );
                    errors.push((
                        rank,
                        SourceError {
                            source: call.tag,
                            message: e.reason().to_string(),
                        },
                    ));
                }
            }
        }

        errors.sort_by_key(|(rank, _)| *rank);

        SearchOutcome {
            recipes: buckets.into_values().flatten().collect(),
            errors: errors.into_iter().map(|(_, e)| e).collect(),
        }
    }

    async fn call_provider(&self, call: &Call) -> Result<Vec<UnifiedRecipe>, ProviderError> {
        let source = call.source;
        let Some(provider) = self.providers.get(source) else {
            return Err(ProviderError::not_configured(source, "no client registered"));
        };
        let timeout = self.config.timeout_for(source);
        let span = tracing::info_span!("provider.search", source = %source, keyword = %call.keyword);

        async move {
            match tokio::time::timeout(timeout, provider.search(&call.keyword, call.limit)).await {
                Ok(Ok(items)) => {
                    tracing::debug!(hits = items.len(), "provider search complete");
                    Ok(items.into_iter().map(map_raw_item).collect())
                }
                Ok(Err(e)) => Err(e),
                Err(_) => Err(ProviderError::unavailable(
                    source,
                    format!("timed out after {}ms", timeout.as_millis()),
                )),
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::find_category;
    use crate::http::MockClient;
    use crate::providers::{TheMealDbProvider, THEMEALDB_BASE_URL};
    use std::sync::Arc;
    use std::time::Duration;

    fn meals(ids: &[&str]) -> String {
        let meals: Vec<_> = ids
            .iter()
            .map(|id| serde_json::json!({"idMeal": id, "strMeal": format!("Meal {id}")}))
            .collect();
        serde_json::json!({ "meals": meals }).to_string()
    }

    fn mealdb_only(http: MockClient) -> ProviderSet {
        ProviderSet::new().with(Arc::new(TheMealDbProvider::new(Arc::new(http))))
    }

    #[tokio::test]
    async fn unregistered_sources_are_silent() {
        let http = MockClient::new().with_body(THEMEALDB_BASE_URL, &meals(&["1", "2"]));
        let aggregator = Aggregator::new(mealdb_only(http), SearchConfig::default());

        let outcome = aggregator
            .search("chicken", &[Source::Rakuten, Source::TheMealDb], 10)
            .await;
        assert_eq!(outcome.recipes.len(), 2);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn failure_becomes_error_entry() {
        let http = MockClient::new().with_status(THEMEALDB_BASE_URL, 500);
        let aggregator = Aggregator::new(mealdb_only(http), SearchConfig::default());

        let outcome = aggregator.search("chicken", &[Source::TheMealDb], 10).await;
        assert!(outcome.recipes.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].source, "themealdb");
    }

    #[tokio::test(start_paused = true)]
    async fn stall_times_out() {
        let http = MockClient::new().with_stall(THEMEALDB_BASE_URL);
        let config = SearchConfig::default().with_timeout(Duration::from_millis(250));
        let aggregator = Aggregator::new(mealdb_only(http), config);

        let outcome = aggregator.search("chicken", &[Source::TheMealDb], 10).await;
        assert_eq!(outcome.errors[0].message, "timed out after 250ms");
    }

    #[tokio::test]
    async fn category_errors_are_tagged_per_keyword() {
        let http = MockClient::new()
            .with_body(&format!("{THEMEALDB_BASE_URL}?s=pasta"), &meals(&["1"]))
            .with_body(&format!("{THEMEALDB_BASE_URL}?s=spaghetti"), &meals(&["2"]))
            .with_status(&format!("{THEMEALDB_BASE_URL}?s=carbonara"), 503);
        let aggregator = Aggregator::new(mealdb_only(http), SearchConfig::default());

        let outcome = aggregator
            .search_category(find_category("パスタ").unwrap())
            .await;
        let ids: Vec<_> = outcome.recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["themealdb-1", "themealdb-2"]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].source, "themealdb-carbonara");
    }
}
