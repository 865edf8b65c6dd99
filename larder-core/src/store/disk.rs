//! One pretty-printed JSON file per entry.
//!
//! Layout: `{dir}/{sha256(recipe_id)[0:2]}/{recipe_id}.json`. Entries are
//! written to a temporary file and hard-linked into place, so a reader
//! never sees a half-written entry and a second writer cannot replace the
//! first.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{EnrichmentStore, StoreError};
use crate::types::CacheEntry;

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `LARDER_ENRICHMENT_CACHE_DIR`, else [`DiskStore::default_dir`].
    pub fn from_env() -> Self {
        let dir = std::env::var("LARDER_ENRICHMENT_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_dir());
        Self::new(dir)
    }

    /// Get the default store directory: ~/.larder/enrichment-cache
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".larder").join("enrichment-cache"))
            .unwrap_or_else(|| PathBuf::from("data/enrichment-cache"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, recipe_id: &str) -> PathBuf {
        let hash = sha256_hex(recipe_id);
        let file_name: String = recipe_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(&hash[..2]).join(format!("{file_name}.json"))
    }
}

#[async_trait]
impl EnrichmentStore for DiskStore {
    async fn get(&self, recipe_id: &str) -> Result<Option<CacheEntry>, StoreError> {
        let path = self.entry_path(recipe_id);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry = match serde_json::from_str(&json) {
            Ok(entry) => entry,
            Err(e) => {
                // Move it aside so the next insert can write a good entry.
                let aside = path.with_extension("json.corrupt");
                tracing::warn!(recipe_id, path = %path.display(), error = %e, "quarantining corrupt enrichment entry");
                if let Err(rename_err) = tokio::fs::rename(&path, &aside).await {
                    tracing::error!(recipe_id, error = %rename_err, "failed to quarantine corrupt entry");
                }
                return Err(e.into());
            }
        };
        // Sanitized file names can collide; the stored id is authoritative.
        Ok((entry.recipe_id == recipe_id).then_some(entry))
    }

    async fn insert_if_absent(&self, entry: &CacheEntry) -> Result<bool, StoreError> {
        let path = self.entry_path(&entry.recipe_id);
        let Some(parent) = path.parent() else {
            return Ok(false);
        };
        tokio::fs::create_dir_all(parent).await?;

        let json = serde_json::to_string_pretty(entry)?;
        let tmp = path.with_extension(format!(
            "{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::write(&tmp, json).await?;

        let linked = tokio::fs::hard_link(&tmp, &path).await;
        let _ = tokio::fs::remove_file(&tmp).await;

        match linked {
            Ok(()) => {
                tracing::debug!(recipe_id = %entry.recipe_id, path = %path.display(), "stored enrichment");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
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
                total_time_minutes: 20.0,
                total_cost_estimate: 300.0,
                total_calories: 410.0,
                protein_grams: 12.0,
                fat_grams: 9.0,
                carb_grams: 60.0,
                ingredients: vec![],
                steps: vec![Step::new(1, "Boil", 20.0)],
                original_recipe_id: None,
                image: None,
                url: None,
                source: None,
            },
            cached_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn round_trips_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        let id = "recipe-0123456789abcdef0123456789abcdef";

        assert!(store.get(id).await.unwrap().is_none());
        assert!(store.insert_if_absent(&entry(id, "first")).await.unwrap());
        assert!(!store.insert_if_absent(&entry(id, "second")).await.unwrap());

        let stored = store.get(id).await.unwrap().unwrap();
        assert_eq!(stored.recipe.title, "first");
        assert_eq!(stored.recipe.steps.len(), 1);
    }

    #[tokio::test]
    async fn entries_are_sharded_and_tmp_files_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        let id = "recipe-ffff";
        store.insert_if_absent(&entry(id, "x")).await.unwrap();

        let path = store.entry_path(id);
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "recipe-ffff.json");

        let shard = path.parent().unwrap();
        assert_eq!(shard.file_name().unwrap().len(), 2);
        assert_eq!(std::fs::read_dir(shard).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn new_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        DiskStore::new(dir.path())
            .insert_if_absent(&entry("recipe-a", "kept"))
            .await
            .unwrap();

        let reopened = DiskStore::new(dir.path());
        assert_eq!(
            reopened.get("recipe-a").await.unwrap().unwrap().recipe.title,
            "kept"
        );
    }

    #[tokio::test]
    async fn corrupt_file_is_set_aside() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        let path = store.entry_path("recipe-bad");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            store.get("recipe-bad").await,
            Err(StoreError::Serialization(_))
        ));

        // Quarantined, so the slot can be filled again.
        assert!(path.with_extension("json.corrupt").exists());
        assert!(store.get("recipe-bad").await.unwrap().is_none());
        assert!(store.insert_if_absent(&entry("recipe-bad", "fresh")).await.unwrap());
        assert_eq!(
            store.get("recipe-bad").await.unwrap().unwrap().recipe.title,
            "fresh"
        );
    }
}
