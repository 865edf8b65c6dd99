//! Recipes saved by a user or anonymous session.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::StoreError;
use crate::types::UnifiedRecipe;

#[derive(Error, Debug)]
pub enum SavedRecipeError {
    #[error("Recipe {0} is already saved")]
    AlreadySaved(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub recipe: UnifiedRecipe,
    pub saved_at: DateTime<Utc>,
}

/// Saved recipes keyed by owner identity.
#[async_trait]
pub trait SavedRecipeStore: Send + Sync {
    /// Fails with `AlreadySaved` when the owner already saved `recipe.id`.
    async fn save(&self, owner: &str, recipe: UnifiedRecipe)
        -> Result<SavedRecipe, SavedRecipeError>;

    /// Newest first.
    async fn list(&self, owner: &str) -> Result<Vec<SavedRecipe>, SavedRecipeError>;

    /// Whether a record was removed.
    async fn delete(&self, owner: &str, recipe_id: &str) -> Result<bool, SavedRecipeError>;
}

#[derive(Debug, Default)]
pub struct MemorySavedRecipeStore {
    /// Per owner, oldest first.
    by_owner: DashMap<String, Vec<SavedRecipe>>,
}

impl MemorySavedRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedRecipeStore for MemorySavedRecipeStore {
    async fn save(
        &self,
        owner: &str,
        recipe: UnifiedRecipe,
    ) -> Result<SavedRecipe, SavedRecipeError> {
        let mut saved = self.by_owner.entry(owner.to_string()).or_default();
        if saved.iter().any(|s| s.recipe.id == recipe.id) {
            return Err(SavedRecipeError::AlreadySaved(recipe.id));
        }

        let record = SavedRecipe {
            recipe,
            saved_at: Utc::now(),
        };
        saved.push(record.clone());
        Ok(record)
    }

    async fn list(&self, owner: &str) -> Result<Vec<SavedRecipe>, SavedRecipeError> {
        Ok(self
            .by_owner
            .get(owner)
            .map(|saved| saved.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, owner: &str, recipe_id: &str) -> Result<bool, SavedRecipeError> {
        let Some(mut saved) = self.by_owner.get_mut(owner) else {
            return Ok(false);
        };
        let before = saved.len();
        saved.retain(|s| s.recipe.id != recipe_id);
        Ok(saved.len() != before)
    }
}
