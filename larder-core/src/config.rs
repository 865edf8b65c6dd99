//! Search configuration from environment variables.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::{parse_source_list, Source};

/// Default per-provider timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default hits requested from each provider in a keyword search.
pub const DEFAULT_LIMIT_PER_SOURCE: usize = 10;

/// Hits requested per provider and keyword in a category search.
pub const CATEGORY_KEYWORD_LIMIT: usize = 100;

/// Recipes per page of a category search.
pub const PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Concatenation order of per-source buckets. Always names every source.
    pub priority: Vec<Source>,
    pub default_timeout: Duration,
    /// Per-source overrides of `default_timeout`.
    pub timeouts: HashMap<Source, Duration>,
    pub limit_per_source: usize,
    pub category_keyword_limit: usize,
    pub page_size: usize,
    /// Fill `translatedTitle` for foreign-language hits that are returned.
    pub translate_titles: bool,
    /// Bound on each title translation call.
    pub translation_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            priority: Source::ALL.to_vec(),
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            timeouts: HashMap::new(),
            limit_per_source: DEFAULT_LIMIT_PER_SOURCE,
            category_keyword_limit: CATEGORY_KEYWORD_LIMIT,
            page_size: PAGE_SIZE,
            translate_titles: false,
            translation_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl SearchConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `LARDER_SOURCE_PRIORITY`: comma-separated sources, highest first
    ///   (default: "themealdb,spoonacular,edamam,rakuten")
    /// - `LARDER_PROVIDER_TIMEOUT_MS`: per-provider timeout (default: 5000)
    /// - `LARDER_PROVIDER_TIMEOUT_MS_<SOURCE>`: override for one source
    /// - `LARDER_TRANSLATE_TITLES`: translate English titles (default: false)
    /// - `LARDER_TRANSLATION_TIMEOUT_MS`: per-title translation timeout (default: 5000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(list) = env::var("LARDER_SOURCE_PRIORITY") {
            let sources = parse_source_list(&list).map_err(|e| ConfigError::InvalidValue {
                var: "LARDER_SOURCE_PRIORITY".to_string(),
                value: list.clone(),
                reason: e.to_string(),
            })?;
            config = config.with_priority(sources);
        }

        if let Some(ms) = parse_ms("LARDER_PROVIDER_TIMEOUT_MS")? {
            config.default_timeout = Duration::from_millis(ms);
        }

        for source in Source::ALL {
            let var = format!(
                "LARDER_PROVIDER_TIMEOUT_MS_{}",
                source.as_str().to_ascii_uppercase()
            );
            if let Some(ms) = parse_ms(&var)? {
                config.timeouts.insert(*source, Duration::from_millis(ms));
            }
        }

        if let Some(ms) = parse_ms("LARDER_TRANSLATION_TIMEOUT_MS")? {
            config.translation_timeout = Duration::from_millis(ms);
        }

        config.translate_titles = env::var("LARDER_TRANSLATE_TITLES")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(config)
    }

    /// Put `sources` first, in the given order; unlisted sources keep their
    /// default relative order after them.
    pub fn with_priority(mut self, sources: Vec<Source>) -> Self {
        let mut priority = sources;
        for source in Source::ALL {
            if !priority.contains(source) {
                priority.push(*source);
            }
        }
        self.priority = priority;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_source_timeout(mut self, source: Source, timeout: Duration) -> Self {
        self.timeouts.insert(source, timeout);
        self
    }

    pub fn with_translate_titles(mut self, enabled: bool) -> Self {
        self.translate_titles = enabled;
        self
    }

    pub fn with_translation_timeout(mut self, timeout: Duration) -> Self {
        self.translation_timeout = timeout;
        self
    }

    pub fn timeout_for(&self, source: Source) -> Duration {
        self.timeouts
            .get(&source)
            .copied()
            .unwrap_or(self.default_timeout)
    }

    /// Position of `source` in the priority order (0 is highest).
    pub fn rank(&self, source: Source) -> usize {
        self.priority
            .iter()
            .position(|s| *s == source)
            .unwrap_or(self.priority.len())
    }
}

fn parse_ms(var: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                var: var.to_string(),
                value,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_priority_puts_rakuten_last() {
        let config = SearchConfig::default();
        assert_eq!(config.priority, Source::ALL.to_vec());
        assert_eq!(config.rank(Source::TheMealDb), 0);
        assert_eq!(config.rank(Source::Rakuten), 3);
    }

    #[test]
    fn partial_priority_is_completed() {
        let config = SearchConfig::default().with_priority(vec![Source::Rakuten, Source::Edamam]);
        assert_eq!(
            config.priority,
            vec![
                Source::Rakuten,
                Source::Edamam,
                Source::TheMealDb,
                Source::Spoonacular
            ]
        );
    }

    #[test]
    fn source_timeout_overrides_default() {
        let config = SearchConfig::default()
            .with_timeout(Duration::from_secs(2))
            .with_source_timeout(Source::Rakuten, Duration::from_millis(500));
        assert_eq!(config.timeout_for(Source::Rakuten), Duration::from_millis(500));
        assert_eq!(config.timeout_for(Source::Edamam), Duration::from_secs(2));
    }
}
