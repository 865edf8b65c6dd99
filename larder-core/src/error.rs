use thiserror::Error;

use crate::types::Source;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response encoding: {0}")]
    InvalidEncoding(String),
}

impl FetchError {
    /// HTTP status code, when the failure was a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Failure of a single provider search.
///
/// None of these abort a multi-source request: the aggregator records
/// `Unavailable` and `Malformed` in its error list and treats
/// `NotConfigured` as an empty result.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} is not configured: {reason}")]
    NotConfigured { provider: Source, reason: String },

    #[error("{provider} unavailable: {reason}")]
    Unavailable { provider: Source, reason: String },

    #[error("{provider} returned a malformed payload: {reason}")]
    Malformed { provider: Source, reason: String },
}

impl ProviderError {
    pub fn unavailable(source: Source, reason: impl Into<String>) -> Self {
        ProviderError::Unavailable {
            provider: source,
            reason: reason.into(),
        }
    }

    pub fn malformed(source: Source, reason: impl Into<String>) -> Self {
        ProviderError::Malformed {
            provider: source,
            reason: reason.into(),
        }
    }

    pub fn not_configured(source: Source, reason: impl Into<String>) -> Self {
        ProviderError::NotConfigured {
            provider: source,
            reason: reason.into(),
        }
    }

    pub fn source_tag(&self) -> Source {
        match self {
            ProviderError::NotConfigured { provider, .. }
            | ProviderError::Unavailable { provider, .. }
            | ProviderError::Malformed { provider, .. } => *provider,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ProviderError::NotConfigured { reason, .. }
            | ProviderError::Unavailable { reason, .. }
            | ProviderError::Malformed { reason, .. } => reason,
        }
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, ProviderError::NotConfigured { .. })
    }

    /// Wrap a transport error. Spoonacular signals an exhausted quota with 402.
    ///
    /// The reason never includes the request URL, which may carry credentials.
    pub fn from_fetch(source: Source, err: FetchError) -> Self {
        let reason = match err {
            FetchError::Status { status: 402, .. } => "API quota exceeded".to_string(),
            FetchError::Status { status, .. } => format!("HTTP {status}"),
            FetchError::RequestFailed(e) => format!("HTTP request failed: {}", e.without_url()),
            other => other.to_string(),
        };
        ProviderError::unavailable(source, reason)
    }
}

/// Caller-side mistakes: the only errors surfaced as hard failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Page numbers start at 1")]
    InvalidPage,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },
}
