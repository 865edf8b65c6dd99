//! Per-request count of provider searches.
//!
//! The aggregator opens one `provider.search` span per provider call; a
//! tracing Layer bumps a task-local counter for each, and a middleware
//! reports the total in the `X-Provider-Call-Count` response header.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use tracing::{span::Id, Subscriber};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

/// Span name the aggregator uses for a single provider call.
const PROVIDER_SPAN: &str = "provider.search";

pub const PROVIDER_CALL_COUNT_HEADER: &str = "X-Provider-Call-Count";

tokio::task_local! {
    /// Provider calls issued by the current request. Follows the task across
    /// await points and thread migrations.
    static PROVIDER_CALL_COUNTER: Arc<AtomicU32>;
}

/// Provider calls made so far by this request, if counting is active.
pub fn get_provider_call_count() -> Option<u32> {
    PROVIDER_CALL_COUNTER
        .try_with(|counter| counter.load(Ordering::Relaxed))
        .ok()
}

/// Counts `provider.search` spans into the task-local counter.
///
/// The fan-out polls every provider future on the request's own task, so
/// the spans are created where the counter is in scope.
pub struct ProviderCallCountingLayer;

impl<S> Layer<S> for ProviderCallCountingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, _attrs: &tracing::span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        if span.name() == PROVIDER_SPAN {
            let _ = PROVIDER_CALL_COUNTER.try_with(|counter| {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
    }
}

/// Scope a fresh counter around the request. Must wrap
/// [`provider_call_count_header_middleware`].
pub async fn provider_call_counting_middleware(request: Request<Body>, next: Next) -> Response {
    let counter = Arc::new(AtomicU32::new(0));
    PROVIDER_CALL_COUNTER.scope(counter, next.run(request)).await
}

/// Adds the `X-Provider-Call-Count` header.
/// Only enabled when TRACK_PROVIDER_CALL_COUNT=1 environment variable is set.
pub async fn provider_call_count_header_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    if std::env::var("TRACK_PROVIDER_CALL_COUNT")
        .map(|v| v == "1")
        .unwrap_or(false)
    {
        if let Some(count) = get_provider_call_count() {
            if let Ok(value) = axum::http::header::HeaderValue::from_str(&count.to_string()) {
                response.headers_mut().insert(PROVIDER_CALL_COUNT_HEADER, value);
            }
        }
    }

    response
}
