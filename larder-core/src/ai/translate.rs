//! Recipe title translation.

use super::prompts::{
    render_translate_system_prompt, render_translate_user_prompt, TRANSLATE_PROMPT_NAME,
};
use super::{AiClient, AiError, ChatMessage, ChatRequest};

/// Translate an English recipe title to Japanese.
pub async fn translate_title(ai_client: &dyn AiClient, title: &str) -> Result<String, AiError> {
    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(render_translate_system_prompt()),
            ChatMessage::user(render_translate_user_prompt(title)),
        ],
        max_tokens: Some(100),
        temperature: Some(0.3),
        json_response: false,
    };

    let response = ai_client.complete(TRANSLATE_PROMPT_NAME, request).await?;
    let translated = response.content.trim().trim_matches('"').trim();
    if translated.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(translated.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;

    #[tokio::test]
    async fn strips_quotes_and_whitespace() {
        let client = FakeAiClient::new().with_response("Beef Stew", " \"ビーフシチュー\"\n");
        let translated = translate_title(&client, "Beef Stew").await.unwrap();
        assert_eq!(translated, "ビーフシチュー");
    }

    #[tokio::test]
    async fn blank_answer_is_an_error() {
        let client = FakeAiClient::new().with_default_response("  ");
        assert!(translate_title(&client, "Beef Stew").await.is_err());
    }
}
