//! Entry points used by the server and the CLI.

use std::sync::Arc;

use futures::StreamExt;

use crate::aggregator::Aggregator;
use crate::ai::{chat, translate_title, AiClient, ChatError, ChatMessage};
use crate::categories::{find_category, list_categories, CategoryInfo};
use crate::config::SearchConfig;
use crate::dedup::{merge, paginate};
use crate::enrichment::EnrichmentGateway;
use crate::error::{ConfigError, RequestError};
use crate::http::HttpClient;
use crate::providers::ProviderSet;
use crate::store::EnrichmentStore;
use crate::types::{
    CategorySearchResponse, EnrichedRecipe, KeywordSearchResponse, Source, UnifiedRecipe,
};

/// Concurrent title translations per response.
const TRANSLATION_CONCURRENCY: usize = 8;

#[derive(Clone)]
pub struct RecipeService {
    aggregator: Aggregator,
    gateway: EnrichmentGateway,
}

impl RecipeService {
    pub fn new(aggregator: Aggregator, gateway: EnrichmentGateway) -> Self {
        Self {
            aggregator,
            gateway,
        }
    }

    /// Wire providers, search configuration and enrichment from the
    /// environment. `ai` also translates titles when that is enabled, and
    /// answers chat.
    pub fn from_env(
        http: Arc<dyn HttpClient>,
        ai: Arc<dyn AiClient>,
        store: Arc<dyn EnrichmentStore>,
    ) -> Result<Self, ConfigError> {
        let config = SearchConfig::from_env()?;
        let aggregator = Aggregator::new(ProviderSet::from_env(http), config);
        Ok(Self::new(aggregator, EnrichmentGateway::new(ai, store)))
    }

    pub fn gateway(&self) -> &EnrichmentGateway {
        &self.gateway
    }

    /// Search `sources` (all, in priority order, when empty) for `query`.
    pub async fn search_by_keyword(
        &self,
        query: &str,
        sources: &[Source],
        limit_per_source: Option<usize>,
    ) -> Result<KeywordSearchResponse, RequestError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RequestError::MissingField("q"));
        }

        let config = self.aggregator.config();
        let sources = if sources.is_empty() {
            config.priority.clone()
        } else {
            sources.to_vec()
        };
        let limit = limit_per_source.unwrap_or(config.limit_per_source);

        let outcome = self.aggregator.search(query, &sources, limit).await;
        let mut recipes = merge([outcome.recipes]);
        self.translate_titles(&mut recipes).await;
        tracing::info!(
            query,
            total = recipes.len(),
            errors = outcome.errors.len(),
            "keyword search complete"
        );

        Ok(KeywordSearchResponse {
            total_count: recipes.len(),
            recipes,
            sources,
            errors: non_empty(outcome.errors),
        })
    }

    /// One page (1-based) of the merged results for every keyword of `category`.
    pub async fn search_by_category(
        &self,
        category: &str,
        page: usize,
    ) -> Result<CategorySearchResponse, RequestError> {
        let category = find_category(category)?;
        if page == 0 {
            return Err(RequestError::InvalidPage);
        }

        let outcome = self.aggregator.search_category(category).await;
        let mut page = paginate(
            merge([outcome.recipes]),
            page,
            self.aggregator.config().page_size,
        )?;
        self.translate_titles(&mut page.recipes).await;
        tracing::info!(
            category = category.name,
            total = page.total_count,
            page = page.page,
            errors = outcome.errors.len(),
            "category search complete"
        );

        Ok(CategorySearchResponse {
            recipes: page.recipes,
            total_count: page.total_count,
            page: page.page,
            page_size: page.page_size,
            has_more: page.has_more,
            category: category.name.to_string(),
            english_keywords: category
                .english_keywords
                .iter()
                .map(|k| k.to_string())
                .collect(),
            errors: non_empty(outcome.errors),
        })
    }

    /// Enriched form of `recipe`. Only malformed input is an error.
    pub async fn enrich(&self, recipe: &UnifiedRecipe) -> Result<EnrichedRecipe, RequestError> {
        self.gateway.get_or_compute(recipe).await
    }

    /// Cooking-assistant reply to the latest turn of `messages` about `recipe`.
    pub async fn chat(
        &self,
        recipe: &EnrichedRecipe,
        messages: &[ChatMessage],
    ) -> Result<ChatMessage, ChatError> {
        chat(self.gateway.ai_client(), recipe, messages).await
    }

    pub fn categories(&self) -> Vec<CategoryInfo> {
        list_categories()
    }

    /// Fill `translated_title` on foreign-language recipes about to be
    /// returned. A failed or slow translation leaves the field empty.
    async fn translate_titles(&self, recipes: &mut [UnifiedRecipe]) {
        let config = self.aggregator.config();
        if !config.translate_titles {
            return;
        }
        let ai = self.gateway.ai_client();
        let timeout = config.translation_timeout;

        futures::stream::iter(
            recipes
                .iter_mut()
                .filter(|r| r.source.is_foreign_language() && r.translated_title.is_none()),
        )
        .for_each_concurrent(TRANSLATION_CONCURRENCY, |recipe| async move {
            let translated = tokio::time::timeout(timeout, translate_title(ai, &recipe.title)).await;
            match translated {
                Ok(Ok(translated)) => recipe.translated_title = Some(translated),
                Ok(Err(e)) => {
                    tracing::warn!(recipe_id = %recipe.id, error = %e, "title translation failed");
                }
                Err(_) => {
                    tracing::warn!(recipe_id = %recipe.id, ?timeout, "title translation timed out");
                }
            }
        })
        .await;
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}
