//! AI prompt templates.

pub mod chat;
pub mod enrich;
pub mod translate;

pub use chat::{render_chat_system_prompt, CHAT_PROMPT_NAME};
pub use enrich::{render_enrich_system_prompt, render_enrich_user_prompt, ENRICH_PROMPT_NAME};
pub use translate::{
    render_translate_system_prompt, render_translate_user_prompt, TRANSLATE_PROMPT_NAME,
};
