//! Owner identity for saved recipes, taken from the `X-Session-Id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::Response;

use super::error_response;

pub const SESSION_HEADER: &str = "X-Session-Id";

/// The caller's session id. Rejects with 401 when the header is absent,
/// blank or not valid UTF-8.
#[derive(Debug, Clone)]
pub struct SessionOwner(pub String);

impl<S> FromRequestParts<S> for SessionOwner
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(SESSION_HEADER) else {
            return Err(error_response(
                StatusCode::UNAUTHORIZED,
                format!("Missing {SESSION_HEADER} header"),
            ));
        };

        match value.to_str().map(str::trim) {
            Ok(id) if !id.is_empty() => Ok(SessionOwner(id.to_string())),
            _ => Err(error_response(
                StatusCode::UNAUTHORIZED,
                format!("Invalid {SESSION_HEADER} header"),
            )),
        }
    }
}
