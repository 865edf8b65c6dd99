use sha2::{Digest, Sha256};

use crate::types::{EnrichmentRequest, Source, UnifiedRecipe};

/// Title the enrichment is keyed and prompted on. TheMealDB hits use their
/// translation when one was made.
pub fn request_title(recipe: &UnifiedRecipe) -> &str {
    match recipe.source {
        Source::TheMealDb => recipe.display_title(),
        Source::Spoonacular | Source::Edamam | Source::Rakuten => &recipe.title,
    }
}

/// Cache key for an enrichment: `recipe-` and 32 hex chars of the SHA-256
/// of the trimmed title. Equal titles share an entry whatever their source.
pub fn recipe_id(title: &str) -> String {
    let digest = Sha256::digest(title.trim().as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("recipe-{}", &hex[..32])
}

pub fn build_request(recipe: &UnifiedRecipe) -> EnrichmentRequest {
    let ingredients = || recipe.ingredients.clone().unwrap_or_default();

    let (ingredient_lines, freeform_instructions) = match recipe.source {
        Source::Edamam => (
            ingredients(),
            format!(
                "Cooking time: {} minutes. Serves {}.",
                recipe.time.unwrap_or(0),
                recipe.servings.unwrap_or(0)
            ),
        ),
        Source::TheMealDb | Source::Spoonacular => {
            (ingredients(), recipe.instructions.clone().unwrap_or_default())
        }
        Source::Rakuten => (
            recipe
                .raw_material_lines
                .clone()
                .unwrap_or_else(ingredients),
            recipe.raw_indication_text.clone().unwrap_or_default(),
        ),
    };

    EnrichmentRequest {
        title: request_title(recipe).trim().to_string(),
        ingredient_lines,
        freeform_instructions,
    }
}
