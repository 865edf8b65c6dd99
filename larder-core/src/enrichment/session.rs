use std::collections::HashMap;

use super::EnrichmentGateway;
use crate::error::RequestError;
use crate::types::EnrichedRecipe;
use crate::types::UnifiedRecipe;

/// Enriched recipes already shown in one interactive session, keyed by
/// search-result id. Lives only as long as the session.
#[derive(Debug, Default)]
pub struct SessionRecipeCache {
    entries: HashMap<String, EnrichedRecipe>,
}

impl SessionRecipeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, recipe_id: &str) -> Option<&EnrichedRecipe> {
        self.entries.get(recipe_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Session copy of `recipe`'s enrichment, asking `gateway` on first use.
    pub async fn get_or_enrich(
        &mut self,
        gateway: &EnrichmentGateway,
        recipe: &UnifiedRecipe,
    ) -> Result<EnrichedRecipe, RequestError> {
        if let Some(enriched) = self.entries.get(&recipe.id) {
            return Ok(enriched.clone());
        }
        let enriched = gateway.get_or_compute(recipe).await?;
        self.entries.insert(recipe.id.clone(), enriched.clone());
        Ok(enriched)
    }
}
