use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{EnrichmentStore, StoreError};
use crate::types::CacheEntry;

/// In-process store, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl EnrichmentStore for MemoryStore {
    async fn get(&self, recipe_id: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.entries.get(recipe_id).map(|e| e.value().clone()))
    }

    async fn insert_if_absent(&self, entry: &CacheEntry) -> Result<bool, StoreError> {
        match self.entries.entry(entry.recipe_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(entry.clone());
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnrichedRecipe, Step};
    use chrono::Utc;

    fn entry(recipe_id: &str, title: &str) -> CacheEntry {
        CacheEntry {
            recipe_id: recipe_id.to_string(),
            recipe: EnrichedRecipe {
                title: title.to_string(),
                total_time_minutes: 30.0,
                total_cost_estimate: 0.0,
                total_calories: 0.0,
                protein_grams: 0.0,
                fat_grams: 0.0,
                carb_grams: 0.0,
                ingredients: vec![],
                steps: vec![Step::new(1, "Cook", 30.0)],
                original_recipe_id: None,
                image: None,
                url: None,
                source: None,
            },
            cached_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn first_insert_wins() {
        let store = MemoryStore::new();
        assert!(store.get("recipe-1").await.unwrap().is_none());

        assert!(store.insert_if_absent(&entry("recipe-1", "first")).await.unwrap());
        assert!(!store.insert_if_absent(&entry("recipe-1", "second")).await.unwrap());

        let stored = store.get("recipe-1").await.unwrap().unwrap();
        assert_eq!(stored.recipe.title, "first");
        assert_eq!(store.len(), 1);
    }
}
