//! Outgoing HTTP for provider clients.
//!
//! All provider requests go through the [`HttpClient`] trait so that tests can
//! swap in [`MockClient`] and production gets timeouts and per-host pacing.

mod client;
mod rate_limiter;

pub use client::{HttpClient, MockClient, MockResponse, ReqwestClient, ReqwestClientBuilder};
pub use rate_limiter::RateLimiter;

/// Build a URL from a base and query pairs, percent-encoding the values.
pub fn build_url(base: &str, params: &[(&str, &str)]) -> Result<String, crate::FetchError> {
    let mut url =
        url::Url::parse(base).map_err(|e| crate::FetchError::InvalidUrl(e.to_string()))?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url.into())
}

/// Replace credential values in a URL before it is logged.
pub fn redact_url(url: &str, secrets: &[&str]) -> String {
    secrets
        .iter()
        .filter(|s| !s.is_empty())
        .fold(url.to_string(), |acc, secret| acc.replace(secret, "REDACTED"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_encodes_values() {
        let url = build_url(
            "https://www.themealdb.com/api/json/v1/1/search.php",
            &[("s", "fried rice")],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://www.themealdb.com/api/json/v1/1/search.php?s=fried+rice"
        );
    }

    #[test]
    fn build_url_rejects_garbage() {
        assert!(build_url("not a url", &[]).is_err());
    }

    #[test]
    fn redact_url_hides_keys() {
        let redacted = redact_url("https://x.test/?apiKey=abc123&q=egg", &["abc123", ""]);
        assert_eq!(redacted, "https://x.test/?apiKey=REDACTED&q=egg");
    }
}
