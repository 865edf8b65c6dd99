use crate::api::{error_response, json_rejection_response, request_error_response, ErrorResponse};
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, response::IntoResponse, Json};
use larder_core::ai::{ChatError, ChatMessage};
use larder_core::EnrichedRecipe;
use serde::Deserialize;
use utoipa::ToSchema;

const MISSING_INPUT: &str = "Messages and recipe data are required";

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequestBody {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub recipe: Option<EnrichedRecipe>,
}

/// Ask the cooking assistant about a recipe
///
/// The conversation is stateless: clients send the full history with every
/// turn and get back the assistant's next message.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequestBody,
    responses(
        (status = 200, description = "Assistant reply", body = ChatMessage),
        (status = 400, description = "Messages or recipe missing", body = ErrorResponse),
        (status = 500, description = "Model call failed", body = ErrorResponse)
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    body: Result<Json<ChatRequestBody>, JsonRejection>,
) -> impl IntoResponse {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(&rejection),
    };

    let (Some(messages), Some(recipe)) = (request.messages, request.recipe) else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_INPUT);
    };
    if messages.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, MISSING_INPUT);
    }

    match state.recipes.chat(&recipe, &messages).await {
        Ok(reply) => Json(reply).into_response(),
        Err(ChatError::Request(e)) => request_error_response(&e),
        Err(e @ ChatError::Ai(_)) => {
            tracing::error!(recipe = %recipe.title, error = %e, "chat failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
