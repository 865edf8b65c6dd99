//! Enrichment of a search hit into a full recipe, cached per recipe title.

mod gateway;
mod request;
mod response;
mod session;

pub use gateway::EnrichmentGateway;
pub use request::{build_request, recipe_id, request_title};
pub use response::{fallback_recipe, parse_enrichment, placeholder_steps};
pub use session::SessionRecipeCache;

use thiserror::Error;

use crate::ai::AiError;

/// Failure of one enrichment attempt. Callers of the gateway never see
/// these; they get the degraded fallback instead.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("enrichment call failed: {0}")]
    Ai(#[from] AiError),

    #[error("unparseable enrichment response: {0}")]
    Parse(#[from] serde_json::Error),
}
