use super::request::request_title;
use super::EnrichmentError;
use crate::types::{EnrichedIngredient, EnrichedRecipe, Step, UnifiedRecipe};

/// Minutes assumed when a degraded result has no time of its own.
const FALLBACK_TOTAL_MINUTES: f64 = 15.0;

/// Steps used when the model returns none.
pub fn placeholder_steps() -> Vec<Step> {
    vec![
        Step::new(1, "Prepare the ingredients", 5.0),
        Step::new(2, "Cook", 20.0),
        Step::new(3, "Plate and serve", 5.0),
    ]
}

/// Parse a model response into an [`EnrichedRecipe`].
///
/// Markdown code fences are tolerated. Steps with no description are
/// dropped and the rest renumbered from 1; an empty step list is replaced
/// by [`placeholder_steps`]. A blank title falls back to `title`.
pub fn parse_enrichment(content: &str, title: &str) -> Result<EnrichedRecipe, EnrichmentError> {
    let mut recipe: EnrichedRecipe = serde_json::from_str(strip_code_fences(content))?;

    if recipe.title.trim().is_empty() {
        recipe.title = title.to_string();
    }

    recipe.steps.retain(|s| !s.description.trim().is_empty());
    if recipe.steps.is_empty() {
        recipe.steps = placeholder_steps();
    }
    for (i, step) in recipe.steps.iter_mut().enumerate() {
        step.step_number = i as u32 + 1;
    }

    Ok(recipe.without_origin())
}

/// Degraded result used when enrichment fails: the search hit's own data,
/// every ingredient "to taste", and one step pointing at the original page.
pub fn fallback_recipe(recipe: &UnifiedRecipe) -> EnrichedRecipe {
    let lines = recipe
        .ingredients
        .as_ref()
        .or(recipe.raw_material_lines.as_ref())
        .cloned()
        .unwrap_or_default();

    EnrichedRecipe {
        title: request_title(recipe).to_string(),
        total_time_minutes: recipe.time.map_or(FALLBACK_TOTAL_MINUTES, f64::from),
        total_cost_estimate: 0.0,
        total_calories: recipe.calories.map_or(0.0, f64::from),
        protein_grams: 0.0,
        fat_grams: 0.0,
        carb_grams: 0.0,
        ingredients: lines
            .into_iter()
            .map(|name| EnrichedIngredient {
                name,
                amount: "to taste".to_string(),
                cost: 0.0,
                calories: 0.0,
            })
            .collect(),
        steps: vec![Step::new(
            1,
            format!("See the full method at {}", recipe.url),
            0.0,
        )],
        original_recipe_id: None,
        image: None,
        url: None,
        source: None,
    }
    .with_origin(recipe)
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
