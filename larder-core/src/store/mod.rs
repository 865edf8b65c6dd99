//! Persistence behind the enrichment cache and saved recipes.

mod disk;
mod memory;
mod saved;

pub use disk::DiskStore;
pub use memory::MemoryStore;
pub use saved::{MemorySavedRecipeStore, SavedRecipe, SavedRecipeError, SavedRecipeStore};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::CacheEntry;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value store of enrichment results.
///
/// Entries are immutable: `insert_if_absent` never replaces an existing
/// entry and reports whether it wrote one.
#[async_trait]
pub trait EnrichmentStore: Send + Sync {
    async fn get(&self, recipe_id: &str) -> Result<Option<CacheEntry>, StoreError>;

    async fn insert_if_absent(&self, entry: &CacheEntry) -> Result<bool, StoreError>;
}
