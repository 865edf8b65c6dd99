//! Plain-text rendering of search and enrichment results.

use std::io::Write;

use anyhow::Result;
use larder_core::{CategoryInfo, EnrichedRecipe, SourceError, UnifiedRecipe};
use serde::Serialize;

pub fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Failed sources go to stderr so stdout stays a clean listing.
pub fn print_errors(errors: Option<&[SourceError]>) {
    for error in errors.unwrap_or_default() {
        eprintln!("warning: {}: {}", error.source, error.message);
    }
}

/// Numbered listing; numbering starts after `offset`.
pub fn print_recipes(out: &mut impl Write, recipes: &[UnifiedRecipe], offset: usize) -> Result<()> {
    for (i, recipe) in recipes.iter().enumerate() {
        let mut facts = Vec::new();
        if let Some(time) = recipe.time {
            facts.push(format!("{time} min"));
        }
        if let Some(calories) = recipe.calories {
            facts.push(format!("{calories} kcal"));
        }

        write!(out, "{:>3}. {} [{}]", offset + i + 1, recipe.display_title(), recipe.source)?;
        if !facts.is_empty() {
            write!(out, " {}", facts.join(", "))?;
        }
        writeln!(out)?;
        if !recipe.url.is_empty() {
            writeln!(out, "     {}", recipe.url)?;
        }
    }
    Ok(())
}

pub fn print_categories(out: &mut impl Write, categories: &[CategoryInfo]) -> Result<()> {
    for category in categories {
        writeln!(
            out,
            "{} {}  ({})",
            category.icon,
            category.name,
            category.english_keywords.join(", ")
        )?;
    }
    Ok(())
}

pub fn print_enriched(out: &mut impl Write, recipe: &EnrichedRecipe) -> Result<()> {
    writeln!(out, "{}", recipe.title)?;
    writeln!(
        out,
        "{} min, about {} yen, {} kcal (P {}g / F {}g / C {}g)",
        recipe.total_time_minutes,
        recipe.total_cost_estimate,
        recipe.total_calories,
        recipe.protein_grams,
        recipe.fat_grams,
        recipe.carb_grams
    )?;

    writeln!(out, "\nIngredients")?;
    for ingredient in &recipe.ingredients {
        writeln!(out, "  - {} {}", ingredient.name, ingredient.amount)?;
    }

    writeln!(out, "\nSteps")?;
    for step in &recipe.steps {
        match step.time_minutes {
            Some(minutes) if minutes > 0.0 => writeln!(
                out,
                "  {}. {} ({} min)",
                step.step_number, step.description, minutes
            )?,
            _ => writeln!(out, "  {}. {}", step.step_number, step.description)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::{Source, Step};

    #[test]
    fn listing_numbers_from_offset() {
        let recipe = UnifiedRecipe {
            id: "rakuten-1".to_string(),
            title: "肉じゃが".to_string(),
            translated_title: None,
            image: String::new(),
            url: "https://recipe.rakuten.co.jp/recipe/1/".to_string(),
            source: Source::Rakuten,
            calories: None,
            time: Some(30),
            servings: None,
            ingredients: None,
            raw_material_lines: None,
            raw_indication_text: None,
            category: None,
            cuisine: None,
            tags: vec![],
            instructions: None,
        };
        let mut out = Vec::new();
        print_recipes(&mut out, &[recipe], 50).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(" 51. 肉じゃが [rakuten] 30 min\n"));
        assert!(text.contains("https://recipe.rakuten.co.jp/recipe/1/"));
    }

    #[test]
    fn zero_minute_steps_omit_time() {
        let recipe = EnrichedRecipe {
            title: "Stew".to_string(),
            total_time_minutes: 15.0,
            total_cost_estimate: 0.0,
            total_calories: 0.0,
            protein_grams: 0.0,
            fat_grams: 0.0,
            carb_grams: 0.0,
            ingredients: vec![],
            steps: vec![
                Step::new(1, "See the full method at https://example.test", 0.0),
                Step::new(2, "Cook", 20.0),
            ],
            original_recipe_id: None,
            image: None,
            url: None,
            source: None,
        };
        let mut out = Vec::new();
        print_enriched(&mut out, &recipe).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  1. See the full method at https://example.test\n"));
        assert!(text.contains("  2. Cook (20 min)\n"));
    }
}
