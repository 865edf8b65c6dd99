//! LLM access for enrichment, title translation and the cooking assistant.
//!
//! This module provides:
//! - `AiClient` trait for abstracting the model endpoint
//! - `OpenAiClient` for any OpenAI-compatible API, with request pacing
//! - `FakeAiClient` for tests
//! - Prompt templates
//!
//! # Configuration
//!
//! - `OPENAI_API_KEY` (required): API key
//! - `LARDER_AI_MODEL` (optional): model name, default "gpt-4o-mini"
//! - `LARDER_AI_BASE_URL` (optional): API base URL
//! - `LARDER_AI_RATE_LIMIT_MS` (optional): delay between requests in ms

mod chat;
mod client;
mod config;
mod fake;
pub mod prompts;
mod translate;
mod types;

pub use chat::{chat, ChatError};
pub use client::{client_from_env, AiClient, AiError, DisabledAiClient, OpenAiClient};
pub use config::AiConfig;
pub use fake::FakeAiClient;
pub use translate::translate_title;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Role, Usage};
