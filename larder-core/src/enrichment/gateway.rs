//! Enrichment behind a write-through persistent cache.
//!
//! A hit returns the stored record without calling the model. A miss calls
//! the model once, stores the result, then returns it; concurrent misses for
//! the same recipe id wait on one in-flight call. Failures never reach the
//! caller: they produce [`fallback_recipe`], which is not stored.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use super::request::{build_request, recipe_id};
use super::response::{fallback_recipe, parse_enrichment};
use super::EnrichmentError;
use crate::ai::prompts::{
    render_enrich_system_prompt, render_enrich_user_prompt, ENRICH_PROMPT_NAME,
};
use crate::ai::{AiClient, ChatMessage, ChatRequest};
use crate::error::RequestError;
use crate::store::EnrichmentStore;
use crate::types::{CacheEntry, EnrichedRecipe, EnrichmentRequest, UnifiedRecipe};

const ENRICH_TEMPERATURE: f32 = 0.7;
const ENRICH_MAX_TOKENS: u32 = 4096;

#[derive(Clone)]
pub struct EnrichmentGateway {
    ai: Arc<dyn AiClient>,
    store: Arc<dyn EnrichmentStore>,
    in_flight: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl EnrichmentGateway {
    pub fn new(ai: Arc<dyn AiClient>, store: Arc<dyn EnrichmentStore>) -> Self {
        Self {
            ai,
            store,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// The model client, shared with translation and chat.
    pub fn ai_client(&self) -> &dyn AiClient {
        self.ai.as_ref()
    }

    /// Enriched form of `recipe`, from the store when present.
    ///
    /// Only a recipe without an id or title is rejected; every other
    /// failure degrades to [`fallback_recipe`].
    pub async fn get_or_compute(
        &self,
        recipe: &UnifiedRecipe,
    ) -> Result<EnrichedRecipe, RequestError> {
        if recipe.id.trim().is_empty() {
            return Err(RequestError::MissingField("id"));
        }
        if recipe.title.trim().is_empty() {
            return Err(RequestError::MissingField("title"));
        }

        let request = build_request(recipe);
        let recipe_id = recipe_id(&request.title);

        if let Some(hit) = self.lookup(&recipe_id).await {
            return Ok(hit.with_origin(recipe));
        }

        // Locals drop in reverse order: the guard, then our lock reference,
        // then the cleanup that removes the entry once nobody holds it.
        let _cleanup = InFlightCleanup {
            table: &self.in_flight,
            recipe_id: &recipe_id,
        };
        let lock = self.in_flight.entry(recipe_id.clone()).or_default().clone();
        let _held = lock.lock().await;
        let enriched = match self.lookup(&recipe_id).await {
            Some(hit) => hit.with_origin(recipe),
            None => self.compute_and_store(&recipe_id, &request, recipe).await,
        };

        Ok(enriched)
    }

    async fn lookup(&self, recipe_id: &str) -> Option<EnrichedRecipe> {
        match self.store.get(recipe_id).await {
            Ok(Some(entry)) => {
                tracing::debug!(recipe_id, "enrichment cache hit");
                Some(entry.recipe)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(recipe_id, error = %e, "enrichment cache lookup failed, treating as miss");
                None
            }
        }
    }

    async fn compute_and_store(
        &self,
        recipe_id: &str,
        request: &EnrichmentRequest,
        recipe: &UnifiedRecipe,
    ) -> EnrichedRecipe {
        let enriched = match self.enrich(request).await {
            Ok(enriched) => enriched,
            Err(e) => {
                tracing::warn!(recipe_id, original_recipe_id = %recipe.id, error = %e, "enrichment failed, using fallback");
                return fallback_recipe(recipe);
            }
        };

        let entry = CacheEntry {
            recipe_id: recipe_id.to_string(),
            recipe: enriched.clone(),
            cached_at: Utc::now(),
        };
        match self.store.insert_if_absent(&entry).await {
            Ok(true) => tracing::info!(recipe_id, steps = enriched.steps.len(), "stored enrichment"),
            Ok(false) => tracing::debug!(recipe_id, "enrichment already stored"),
            Err(e) => tracing::error!(recipe_id, error = %e, "failed to store enrichment"),
        }

        enriched.with_origin(recipe)
    }

    async fn enrich(&self, request: &EnrichmentRequest) -> Result<EnrichedRecipe, EnrichmentError> {
        let chat = ChatRequest {
            messages: vec![
                ChatMessage::system(render_enrich_system_prompt()),
                ChatMessage::user(render_enrich_user_prompt(request)),
            ],
            max_tokens: Some(ENRICH_MAX_TOKENS),
            temperature: Some(ENRICH_TEMPERATURE),
            json_response: true,
        };
        let response = self.ai.complete(ENRICH_PROMPT_NAME, chat).await?;
        parse_enrichment(&response.content, &request.title)
    }
}

/// Drops the in-flight entry for `recipe_id` when its last user is gone,
/// including users whose future was dropped mid-wait.
struct InFlightCleanup<'a> {
    table: &'a DashMap<String, Arc<Mutex<()>>>,
    recipe_id: &'a str,
}

impl Drop for InFlightCleanup<'_> {
    fn drop(&mut self) {
        self.table
            .remove_if(self.recipe_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;
    use crate::store::MemoryStore;
    use crate::types::Source;
    use std::time::Duration;

    const CURRY: &str = r#"{"title": "Curry", "totalTime": 40, "totalCalories": 600,
        "ingredients": [{"name": "onion", "amount": "1", "cost": 40, "calories": 40}],
        "steps": [{"stepNumber": 1, "description": "Fry the onion", "timeMinutes": 10}]}"#;

    fn hit(id: &str, title: &str) -> UnifiedRecipe {
        UnifiedRecipe {
            id: id.to_string(),
            title: title.to_string(),
            translated_title: None,
            image: format!("https://img.example/{id}.jpg"),
            url: format!("https://example.test/{id}"),
            source: Source::Spoonacular,
            calories: Some(550),
            time: Some(45),
            servings: Some(4),
            ingredients: Some(vec!["1 onion".to_string()]),
            raw_material_lines: None,
            raw_indication_text: None,
            category: None,
            cuisine: None,
            tags: vec![],
            instructions: None,
        }
    }

    fn gateway(ai: Arc<FakeAiClient>, store: Arc<MemoryStore>) -> EnrichmentGateway {
        EnrichmentGateway::new(ai, store)
    }

    #[tokio::test]
    async fn second_call_is_served_from_store() {
        let ai = Arc::new(FakeAiClient::new().with_default_response(CURRY));
        let store = Arc::new(MemoryStore::new());
        let gateway = gateway(ai.clone(), store.clone());

        let first = gateway.get_or_compute(&hit("spoonacular-1", "Curry")).await.unwrap();
        let second = gateway.get_or_compute(&hit("spoonacular-1", "Curry")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(ai.calls(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(first.original_recipe_id.as_deref(), Some("spoonacular-1"));
    }

    #[tokio::test]
    async fn same_title_shares_entry_across_sources() {
        let ai = Arc::new(FakeAiClient::new().with_default_response(CURRY));
        let gateway = gateway(ai.clone(), Arc::new(MemoryStore::new()));

        gateway.get_or_compute(&hit("spoonacular-1", "Curry")).await.unwrap();
        let other = gateway.get_or_compute(&hit("edamam-xyz", " Curry ")).await.unwrap();

        assert_eq!(ai.calls(), 1);
        assert_eq!(other.original_recipe_id.as_deref(), Some("edamam-xyz"));
        assert_eq!(other.url.as_deref(), Some("https://example.test/edamam-xyz"));
    }

    #[tokio::test]
    async fn failure_falls_back_without_storing() {
        let ai = Arc::new(FakeAiClient::failing("insufficient_quota"));
        let store = Arc::new(MemoryStore::new());
        let gateway = gateway(ai.clone(), store.clone());

        let result = gateway.get_or_compute(&hit("spoonacular-2", "Stew")).await.unwrap();
        assert_eq!(result.total_time_minutes, 45.0);
        assert_eq!(result.steps.len(), 1);
        assert!(store.is_empty());

        // Not cached, so the next call tries again.
        gateway.get_or_compute(&hit("spoonacular-2", "Stew")).await.unwrap();
        assert_eq!(ai.calls(), 2);
    }

    #[tokio::test]
    async fn unparseable_response_falls_back() {
        let ai = Arc::new(FakeAiClient::new().with_default_response("not json"));
        let store = Arc::new(MemoryStore::new());
        let result = gateway(ai, store.clone())
            .get_or_compute(&hit("spoonacular-3", "Pie"))
            .await
            .unwrap();
        assert!(result.steps[0].description.starts_with("See the full method at"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let gateway = gateway(Arc::new(FakeAiClient::new()), Arc::new(MemoryStore::new()));
        assert_eq!(
            gateway.get_or_compute(&hit("spoonacular-4", "  ")).await,
            Err(RequestError::MissingField("title"))
        );
        assert_eq!(
            gateway.get_or_compute(&hit("", "Pie")).await,
            Err(RequestError::MissingField("id"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_call_model_once() {
        let ai = Arc::new(
            FakeAiClient::new()
                .with_default_response(CURRY)
                .with_delay(Duration::from_secs(2)),
        );
        let store = Arc::new(MemoryStore::new());
        let gateway = gateway(ai.clone(), store.clone());

        let a = hit("spoonacular-1", "Curry");
        let b = hit("spoonacular-1", "Curry");
        let (first, second) = tokio::join!(gateway.get_or_compute(&a), gateway.get_or_compute(&b));

        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(ai.calls(), 1);
        assert_eq!(store.len(), 1);
        assert!(gateway.in_flight.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_callers_leave_no_lock_behind() {
        let ai = Arc::new(
            FakeAiClient::new()
                .with_default_response(CURRY)
                .with_delay(Duration::from_secs(2)),
        );
        let gateway = gateway(ai, Arc::new(MemoryStore::new()));

        // Dropped while computing.
        let abandoned = tokio::time::timeout(
            Duration::from_secs(1),
            gateway.get_or_compute(&hit("spoonacular-1", "Curry")),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(gateway.in_flight.is_empty());

        // Dropped while waiting behind another caller.
        let a = hit("spoonacular-2", "Stew");
        let b = hit("spoonacular-2", "Stew");
        let (first, waiter) = tokio::join!(
            gateway.get_or_compute(&a),
            tokio::time::timeout(Duration::from_secs(1), gateway.get_or_compute(&b)),
        );
        assert!(first.is_ok());
        assert!(waiter.is_err());
        assert!(gateway.in_flight.is_empty());
    }

    #[tokio::test]
    async fn loosely_shaped_responses_are_stored() {
        for response in [
            r#"{"title": "Curry", "totalTime": 30, "steps": null}"#,
            r#"{"title": "Curry", "steps": [{"stepNumber": "1", "description": "Fry"}]}"#,
            r#"{"title": "Curry", "steps": [{"stepNumber": 1.0, "description": "Fry"}]}"#,
            r#"{"title": "Curry", "ingredients": null, "steps": [{"description": "Fry"}]}"#,
        ] {
            let ai = Arc::new(FakeAiClient::new().with_default_response(response));
            let store = Arc::new(MemoryStore::new());
            let gateway = gateway(ai.clone(), store.clone());

            let first = gateway.get_or_compute(&hit("spoonacular-1", "Curry")).await.unwrap();
            assert!(
                !first.steps[0].description.starts_with("See the full method at"),
                "{response}"
            );
            assert_eq!(store.len(), 1, "{response}");

            gateway.get_or_compute(&hit("spoonacular-1", "Curry")).await.unwrap();
            assert_eq!(ai.calls(), 1, "{response}");
        }
    }
}
