//! Cooking assistant prompt, grounded in the recipe being cooked.

use crate::types::EnrichedRecipe;

/// Prompt name for logs.
pub const CHAT_PROMPT_NAME: &str = "recipe_chat";

/// System message describing the recipe and how the assistant should talk.
pub fn render_chat_system_prompt(recipe: &EnrichedRecipe) -> String {
    let known = |value: f64, unit: &str| {
        if value > 0.0 {
            format!("{value}{unit}")
        } else {
            "unknown".to_string()
        }
    };
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|i| format!("{} ({})", i.name, i.amount))
        .collect::<Vec<_>>()
        .join(", ");
    let steps = recipe
        .steps
        .iter()
        .map(|s| format!("{}. {}", s.step_number, s.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a friendly cooking assistant helping the user cook the recipe below. You are also happy to chat about things other than cooking.

Recipe
Title: {title}
Time: {time}
Calories: {calories}
Ingredients: {ingredients}

Steps:
{steps}

How to answer:
- Be warm, practical and accurate.
- Answers are read aloud, so keep them short and conversational.
- Only when the user just greets you or says "start", reply that they can ask whenever something is unclear.
- Answer concrete questions ("what do I need?", "what's next?") directly, without a greeting.
- For questions unrelated to cooking, answer from general knowledge. If you cannot know something live, such as today's weather, say so and keep the conversation going.
- Reply in the language the user writes in."#,
        title = recipe.title,
        time = known(recipe.total_time_minutes, " min"),
        calories = known(recipe.total_calories, " kcal"),
        ingredients = if ingredients.is_empty() { "unknown".to_string() } else { ingredients },
        steps = steps,
    )
}
