//! Normalization of provider hits into [`UnifiedRecipe`].
//!
//! Every function here is total: a hit with missing fields still maps to a
//! recipe with a non-empty `id` and `title`.

use sha2::{Digest, Sha256};

use crate::providers::{
    EdamamRecipe, MealDbMeal, RakutenRecipe, RawItem, SpoonacularRecipe, INGREDIENT_SLOTS,
};
use crate::types::{Source, UnifiedRecipe};

pub const PLACEHOLDER_IMAGE: &str = "/placeholder-recipe.jpg";
pub const UNTITLED: &str = "Untitled recipe";

const THEMEALDB_MEAL_URL: &str = "https://www.themealdb.com/meal";

pub fn map_raw_item(item: RawItem) -> UnifiedRecipe {
    match item {
        RawItem::TheMealDb(meal) => map_themealdb(&meal),
        RawItem::Spoonacular(recipe) => map_spoonacular(&recipe),
        RawItem::Edamam(recipe) => map_edamam(&recipe),
        RawItem::Rakuten(recipe) => map_rakuten(&recipe),
    }
}

pub fn map_themealdb(meal: &MealDbMeal) -> UnifiedRecipe {
    let title = title_or_untitled(meal.str_meal.as_deref());
    let native_id = meal
        .id_meal
        .clone()
        .unwrap_or_else(|| fingerprint(&[meal.str_source.as_deref().unwrap_or(""), title.as_str()]));

    let ingredients: Vec<String> = (1..=INGREDIENT_SLOTS)
        .filter_map(|n| match meal.slot(n) {
            (Some(measure), Some(name)) => Some(format!("{measure} {name}")),
            (None, Some(name)) => Some(name.to_string()),
            // A measure without an ingredient says nothing useful.
            (_, None) => None,
        })
        .collect();

    let tags: Vec<String> = meal
        .str_tags
        .as_deref()
        .map(|tags| tags.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    UnifiedRecipe {
        id: unified_id(Source::TheMealDb, &native_id),
        title,
        translated_title: None,
        image: meal
            .str_meal_thumb
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        url: meal
            .str_source
            .clone()
            .unwrap_or_else(|| format!("{THEMEALDB_MEAL_URL}/{native_id}")),
        source: Source::TheMealDb,
        calories: None,
        time: None,
        servings: None,
        ingredients: non_empty(ingredients),
        raw_material_lines: None,
        raw_indication_text: None,
        category: meal.str_category.clone(),
        cuisine: meal.str_area.clone(),
        tags: dedup_tags(tags),
        instructions: meal.str_instructions.clone(),
    }
}

pub fn map_spoonacular(recipe: &SpoonacularRecipe) -> UnifiedRecipe {
    let title = title_or_untitled(recipe.title.as_deref());
    let url = recipe
        .source_url
        .clone()
        .or_else(|| recipe.spoonacular_source_url.clone())
        .unwrap_or_default();
    let native_id = recipe
        .id
        .clone()
        .unwrap_or_else(|| fingerprint(&[url.as_str(), title.as_str()]));

    let ingredients: Vec<String> = recipe
        .extended_ingredients
        .iter()
        .flatten()
        .filter_map(|ing| {
            let metric = ing.measures.as_ref().and_then(|m| m.metric.as_ref());
            let amount = metric.and_then(|m| m.amount).or(ing.amount);
            let unit = metric
                .and_then(|m| m.unit_short.as_deref())
                .or(ing.unit.as_deref());
            let line = [
                amount.map(format_amount),
                unit.map(str::to_string),
                ing.name.clone(),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
            (!line.is_empty()).then_some(line)
        })
        .collect();

    let calories = recipe
        .nutrition
        .as_ref()
        .and_then(|n| n.nutrients.iter().find(|n| n.name.eq_ignore_ascii_case("calories")))
        .map(|n| round_u32(n.amount));

    let flags = [
        (recipe.vegan, "vegan"),
        (recipe.vegetarian, "vegetarian"),
        (recipe.gluten_free, "gluten-free"),
        (recipe.dairy_free, "dairy-free"),
    ];
    let tags = recipe
        .diets
        .iter()
        .chain(&recipe.dish_types)
        .cloned()
        .chain(
            flags
                .into_iter()
                .filter(|(set, _)| *set == Some(true))
                .map(|(_, tag)| tag.to_string()),
        )
        .collect();

    UnifiedRecipe {
        id: unified_id(Source::Spoonacular, &native_id),
        title,
        translated_title: None,
        image: recipe
            .image
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        url,
        source: Source::Spoonacular,
        calories,
        time: recipe.ready_in_minutes.map(round_u32),
        servings: recipe.servings.map(round_u32),
        ingredients: non_empty(ingredients),
        raw_material_lines: None,
        raw_indication_text: None,
        category: recipe.dish_types.first().cloned(),
        cuisine: recipe.cuisines.first().cloned(),
        tags: dedup_tags(tags),
        instructions: recipe.instructions.clone(),
    }
}

pub fn map_edamam(recipe: &EdamamRecipe) -> UnifiedRecipe {
    let title = title_or_untitled(recipe.label.as_deref());
    let url = recipe.url.clone().unwrap_or_default();
    let native_id = recipe
        .native_id()
        .map(str::to_string)
        .unwrap_or_else(|| fingerprint(&[url.as_str(), title.as_str()]));

    // Edamam reports whole-recipe calories.
    let divisor = recipe.servings.unwrap_or(1.0).max(1.0);
    let calories = recipe
        .calories
        .filter(|c| *c > 0.0)
        .map(|c| round_u32(c / divisor));

    let tags = recipe
        .diet_labels
        .iter()
        .chain(&recipe.health_labels)
        .chain(&recipe.dish_type)
        .cloned()
        .collect();

    UnifiedRecipe {
        id: unified_id(Source::Edamam, &native_id),
        title,
        translated_title: None,
        image: recipe
            .image
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        url,
        source: Source::Edamam,
        calories,
        // 0 means "unknown" in Edamam's dialect.
        time: recipe.total_time.filter(|t| *t > 0.0).map(round_u32),
        servings: recipe.servings.map(round_u32),
        ingredients: non_empty(recipe.ingredient_lines.clone()),
        raw_material_lines: None,
        raw_indication_text: None,
        category: recipe.dish_type.first().cloned(),
        cuisine: recipe.cuisine_type.first().cloned(),
        tags: dedup_tags(tags),
        instructions: None,
    }
}

pub fn map_rakuten(recipe: &RakutenRecipe) -> UnifiedRecipe {
    let title = title_or_untitled(recipe.recipe_title.as_deref());
    let url = recipe.recipe_url.clone().unwrap_or_default();
    let native_id = recipe
        .recipe_id
        .clone()
        .unwrap_or_else(|| fingerprint(&[url.as_str(), title.as_str()]));
    let materials = non_empty(recipe.recipe_material.clone());

    UnifiedRecipe {
        id: unified_id(Source::Rakuten, &native_id),
        title,
        translated_title: None,
        image: recipe
            .food_image_url
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        url,
        source: Source::Rakuten,
        calories: None,
        time: recipe.minutes(),
        servings: None,
        ingredients: materials.clone(),
        raw_material_lines: materials,
        raw_indication_text: recipe.recipe_indication.clone(),
        category: recipe.category_name.clone(),
        cuisine: None,
        tags: dedup_tags(recipe.category_name.iter().cloned().collect()),
        instructions: None,
    }
}

/// `"<source>-<nativeId>"`.
pub fn unified_id(source: Source, native_id: &str) -> String {
    format!("{}-{}", source, native_id.trim())
}

/// Short stable stand-in for a missing native id.
pub fn fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.trim().as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    digest[..6].iter().map(|b| format!("{b:02x}")).collect()
}

fn title_or_untitled(title: Option<&str>) -> String {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
        .to_string()
}

fn non_empty(lines: Vec<String>) -> Option<Vec<String>> {
    let lines: Vec<String> = lines
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    (!lines.is_empty()).then_some(lines)
}

/// Trimmed, blank-free, first occurrence kept.
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn round_u32(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// `2.0` -> `"2"`, `0.333` -> `"0.33"`.
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        let s = format!("{amount:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
