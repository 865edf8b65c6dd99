//! Recipe title translation prompt.

pub const TRANSLATE_PROMPT_NAME: &str = "translate_title";

pub fn render_translate_system_prompt() -> String {
    "You are a translator. Translate the given recipe name from English to Japanese. \
     Only return the translated text, nothing else."
        .to_string()
}

pub fn render_translate_user_prompt(title: &str) -> String {
    title.trim().to_string()
}
