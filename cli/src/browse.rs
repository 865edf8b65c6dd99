//! Interactive browsing of one result list.

use std::io::Write;

use anyhow::Result;
use larder_core::{EnrichmentGateway, SessionRecipeCache, UnifiedRecipe};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::output;

/// List `recipes`, then enrich each number read from `input` until EOF or
/// `q`. Revisited recipes come from this run's session cache.
pub async fn run<R, W>(
    gateway: &EnrichmentGateway,
    recipes: &[UnifiedRecipe],
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if recipes.is_empty() {
        writeln!(out, "No recipes found")?;
        return Ok(());
    }

    let mut session = SessionRecipeCache::new();
    output::print_recipes(out, recipes, 0)?;
    writeln!(out, "Enter a number to view a recipe, q to quit")?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let picked = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| recipes.get(i));
        let Some(recipe) = picked else {
            writeln!(out, "Pick a number from 1 to {}", recipes.len())?;
            continue;
        };

        tracing::debug!(
            recipe_id = %recipe.id,
            seen = session.get(&recipe.id).is_some(),
            "browse pick"
        );
        let enriched = session.get_or_enrich(gateway, recipe).await?;
        writeln!(out)?;
        output::print_enriched(out, &enriched)?;
        writeln!(out)?;
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::ai::FakeAiClient;
    use larder_core::store::MemoryStore;
    use larder_core::Source;
    use std::sync::Arc;

    fn recipe(id: &str, title: &str) -> UnifiedRecipe {
        UnifiedRecipe {
            id: id.to_string(),
            title: title.to_string(),
            translated_title: None,
            image: String::new(),
            url: format!("https://example.test/{id}"),
            source: Source::Spoonacular,
            calories: None,
            time: None,
            servings: None,
            ingredients: None,
            raw_material_lines: None,
            raw_indication_text: None,
            category: None,
            cuisine: None,
            tags: vec![],
            instructions: None,
        }
    }

    #[tokio::test]
    async fn repeated_picks_use_the_session_cache() {
        let ai = Arc::new(FakeAiClient::new().with_default_response(
            r#"{"title": "Soup", "steps": [{"description": "Simmer", "timeMinutes": 10}]}"#,
        ));
        let gateway = EnrichmentGateway::new(ai.clone(), Arc::new(MemoryStore::new()));
        let recipes = vec![recipe("spoonacular-1", "Soup"), recipe("spoonacular-2", "Stew")];

        let mut out = Vec::new();
        run(&gateway, &recipes, &b"1\n\n9\n1\nq\n2\n"[..], &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("1. Simmer (10 min)").count(), 2);
        assert!(text.contains("Pick a number from 1 to 2"));
        // "2" came after "q".
        assert_eq!(ai.calls(), 1);
    }

    #[tokio::test]
    async fn empty_results_end_immediately() {
        let gateway = EnrichmentGateway::new(
            Arc::new(FakeAiClient::new()),
            Arc::new(MemoryStore::new()),
        );
        let mut out = Vec::new();
        run(&gateway, &[], &b"1\n"[..], &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No recipes found\n");
    }
}
