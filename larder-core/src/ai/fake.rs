//! Fake AI client for testing.
//!
//! Returns canned responses chosen by substring match against the request's
//! messages, so tests run without network access or API costs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::client::{AiClient, AiError};
use super::types::{ChatRequest, ChatResponse, Usage};

#[derive(Debug, Default)]
pub struct FakeAiClient {
    /// (substring, response), checked in registration order.
    responses: Mutex<Vec<(String, String)>>,
    default_response: Option<String>,
    /// When set, every call fails with this message.
    failure: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeAiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, prompt_contains: &str, response: &str) -> Self {
        self.add_response(prompt_contains, response);
        self
    }

    pub fn add_response(&self, prompt_contains: &str, response: &str) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push((prompt_contains.to_lowercase(), response.to_string()));
        }
    }

    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Every call fails, e.g. to simulate an exhausted quota.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Sleep before answering; exercises concurrent callers.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `complete` calls so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        _prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = &self.failure {
            return Err(AiError::Api(message.clone()));
        }

        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase();

        let matched = self.responses.lock().ok().and_then(|responses| {
            responses
                .iter()
                .find(|(pattern, _)| prompt.contains(pattern.as_str()))
                .map(|(_, response)| response.clone())
        });

        match matched.or_else(|| self.default_response.clone()) {
            Some(content) => Ok(ChatResponse {
                content,
                usage: Usage::default(),
            }),
            None => Err(AiError::Api(format!(
                "FakeAiClient: no response configured for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatMessage;

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user(text)],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn matches_case_insensitively_in_order() {
        let client = FakeAiClient::new()
            .with_response("CURRY", "first")
            .with_response("curry", "second");
        let response = client.complete("test", request("Make a curry")).await.unwrap();
        assert_eq!(response.content, "first");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn unmatched_without_default_is_an_error() {
        let client = FakeAiClient::new();
        assert!(client.complete("test", request("anything")).await.is_err());

        let client = FakeAiClient::new().with_default_response("{}");
        assert_eq!(
            client.complete("test", request("anything")).await.unwrap().content,
            "{}"
        );
    }

    #[tokio::test]
    async fn failing_client_counts_calls() {
        let client = FakeAiClient::failing("insufficient_quota");
        let err = client.complete("test", request("x")).await.unwrap_err();
        assert!(err.to_string().contains("insufficient_quota"));
        assert_eq!(client.calls(), 1);
    }
}
