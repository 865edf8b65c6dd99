//! Prompt that expands a recipe stub into steps, costs and nutrition.

use crate::types::EnrichmentRequest;

/// Prompt name for logs.
pub const ENRICH_PROMPT_NAME: &str = "enrich_recipe";

pub fn render_enrich_system_prompt() -> String {
    "You organize recipe information and estimate nutrition. Always respond with valid JSON only."
        .to_string()
}

/// Render the user message for one recipe.
pub fn render_enrich_user_prompt(request: &EnrichmentRequest) -> String {
    let ingredients = if request.ingredient_lines.is_empty() {
        "unknown".to_string()
    } else {
        request.ingredient_lines.join(", ")
    };
    let hints = if request.freeform_instructions.trim().is_empty() {
        "unknown"
    } else {
        request.freeform_instructions.as_str()
    };

    format!(
        r#"Turn the recipe below into detailed, easy-to-follow cooking steps, a priced ingredient list and nutrition estimates, returned as JSON.

Recipe: {title}
Ingredients: {ingredients}
Method hints: {hints}

Return JSON in exactly this shape:

{{
  "title": "{title}",
  "totalTime": 30,
  "totalCost": 500,
  "totalCalories": 450,
  "protein": 25,
  "fat": 15,
  "carbs": 50,
  "ingredients": [
    {{"name": "onion", "amount": "1 (about 200g)", "cost": 50, "calories": 74}}
  ],
  "steps": [
    {{"stepNumber": 1, "description": "Finely chop the onion and cook over medium heat until translucent", "timeMinutes": 5}},
    {{"stepNumber": 2, "description": "Add the minced meat and cook, breaking it up, until it changes colour", "timeMinutes": 10}}
  ]
}}

Rules:
- Scale the number of steps to the dish: 5-7 for simple dishes, 8-12 for typical ones, 13-20 for complex ones.
- Make every step concrete ("slice the onion thinly and cut the carrot into strips", not "cut the vegetables").
- Cover preparation, cooking and plating, including heat levels and timing.
- totalCalories is per serving in kcal; protein, fat and carbs are grams per serving.
- Give concrete amounts ("2 tbsp", not "to taste").
- Write descriptions in the language of the recipe title."#,
        title = request.title,
        ingredients = ingredients,
        hints = hints,
    )
}
