use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::lenient;

/// External recipe providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[serde(rename = "themealdb")]
    TheMealDb,
    Spoonacular,
    Edamam,
    Rakuten,
}

impl Source {
    /// Default display priority: free English sources first, Rakuten (Japanese) last.
    pub const ALL: &'static [Source] = &[
        Source::TheMealDb,
        Source::Spoonacular,
        Source::Edamam,
        Source::Rakuten,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::TheMealDb => "themealdb",
            Source::Spoonacular => "spoonacular",
            Source::Edamam => "edamam",
            Source::Rakuten => "rakuten",
        }
    }

    /// Whether titles from this source are in a foreign language for the
    /// (Japanese) audience and may be translated.
    pub fn is_foreign_language(&self) -> bool {
        match self {
            Source::TheMealDb | Source::Spoonacular | Source::Edamam => true,
            Source::Rakuten => false,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "themealdb" => Ok(Source::TheMealDb),
            "spoonacular" => Ok(Source::Spoonacular),
            "edamam" => Ok(Source::Edamam),
            "rakuten" => Ok(Source::Rakuten),
            other => Err(RequestError::UnknownSource(other.to_string())),
        }
    }
}

/// Parse a comma-separated source list such as `"rakuten,themealdb"`.
/// Blank entries are ignored and duplicates collapse.
pub fn parse_source_list(list: &str) -> Result<Vec<Source>, RequestError> {
    let mut sources = Vec::new();
    for part in list.split(',').filter(|p| !p.trim().is_empty()) {
        let source: Source = part.parse()?;
        if !sources.contains(&source) {
            sources.push(source);
        }
    }
    Ok(sources)
}

/// Canonical, source-agnostic search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UnifiedRecipe {
    /// `"<source>-<nativeId>"`, unique across providers.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_title: Option<String>,
    pub image: String,
    pub url: String,
    pub source: Source,
    /// Per-serving kcal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_material_lines: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_indication_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl UnifiedRecipe {
    /// Title to show (and enrich) for this recipe: the translation when one exists.
    pub fn display_title(&self) -> &str {
        self.translated_title.as_deref().unwrap_or(&self.title)
    }
}

/// Input to the LLM enrichment step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequest {
    pub title: String,
    pub ingredient_lines: Vec<String>,
    pub freeform_instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EnrichedIngredient {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub amount: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// 1-based and contiguous within a recipe.
    #[serde(default, deserialize_with = "lenient::whole_number")]
    pub step_number: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_minutes: Option<f64>,
}

impl Step {
    pub fn new(step_number: u32, description: impl Into<String>, time_minutes: f64) -> Self {
        Self {
            step_number,
            description: description.into(),
            time_minutes: Some(time_minutes),
        }
    }
}

/// Detailed recipe produced by enrichment.
///
/// Field names on the wire follow the enrichment model's JSON dialect
/// (`totalTime`, `protein`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecipe {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(rename = "totalTime", default, deserialize_with = "lenient::number")]
    pub total_time_minutes: f64,
    #[serde(rename = "totalCost", default, deserialize_with = "lenient::number")]
    pub total_cost_estimate: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_calories: f64,
    #[serde(rename = "protein", default, deserialize_with = "lenient::number")]
    pub protein_grams: f64,
    #[serde(rename = "fat", default, deserialize_with = "lenient::number")]
    pub fat_grams: f64,
    #[serde(rename = "carbs", default, deserialize_with = "lenient::number")]
    pub carb_grams: f64,
    #[serde(default, deserialize_with = "lenient::list")]
    pub ingredients: Vec<EnrichedIngredient>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_recipe_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

impl EnrichedRecipe {
    /// Attach the identity of the search result this record was built for.
    pub fn with_origin(mut self, recipe: &UnifiedRecipe) -> Self {
        self.original_recipe_id = Some(recipe.id.clone());
        self.image = Some(recipe.image.clone());
        self.url = Some(recipe.url.clone());
        self.source = Some(recipe.source);
        self
    }

    /// The persisted form carries enrichment content only.
    pub fn without_origin(mut self) -> Self {
        self.original_recipe_id = None;
        self.image = None;
        self.url = None;
        self.source = None;
        self
    }
}

/// Persisted enrichment result. Written once on a cache miss, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub recipe_id: String,
    pub recipe: EnrichedRecipe,
    pub cached_at: DateTime<Utc>,
}

/// One failed provider call, reported alongside (partial) results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SourceError {
    /// Source name, suffixed with the keyword for category searches
    /// (`"spoonacular-pasta"`).
    pub source: String,
    #[serde(rename = "error")]
    pub message: String,
}

/// Response of a keyword search across providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct KeywordSearchResponse {
    pub recipes: Vec<UnifiedRecipe>,
    pub total_count: usize,
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<SourceError>>,
}

/// Response of a category search: one page of the merged result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategorySearchResponse {
    pub recipes: Vec<UnifiedRecipe>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
    pub category: String,
    pub english_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<SourceError>>,
}
