use thiserror::Error;

/// Failure of a single page fetch attempt.
///
/// Every variant is retryable; the orchestrator decides when to give up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("rate limited by source (HTTP 429)")]
    RateLimited,

    #[error("source returned HTTP {status}")]
    Http { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("source returned an empty body")]
    EmptyBody,
}

impl FetchError {
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 429 => Self::RateLimited,
            Some(status) => Self::Http {
                status: status.as_u16(),
            },
            None => Self::Network(err.to_string()),
        }
    }
}

/// A listing fragment whose markup could not be read.
///
/// Never leaves the parser: the fragment is skipped and parsing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("{field}: element matched by '{css}' has no '{attr}' attribute")]
    MissingAttribute {
        field: &'static str,
        css: String,
        attr: String,
    },
}

/// Failure of a detail page lookup.
#[derive(Debug, Error)]
pub enum DetailError {
    #[error("no posting id in listing URL '{0}'")]
    InvalidListingUrl(String),

    #[error("invalid detail URL: {0}")]
    InvalidDetailUrl(#[from] url::ParseError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("detail lookup cancelled")]
    Cancelled,
}

/// Errors raised while assembling the retrieval engine.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid selector for {field}: '{css}' ({reason})")]
    InvalidSelector {
        field: &'static str,
        css: String,
        reason: String,
    },

    #[error("invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(
            FetchError::Http { status: 503 }.to_string(),
            "source returned HTTP 503"
        );
        assert!(FetchError::RateLimited.to_string().contains("429"));
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(FetchError::RateLimited.is_rate_limited());
        assert!(!FetchError::Http { status: 500 }.is_rate_limited());
        assert!(!FetchError::EmptyBody.is_rate_limited());
    }

    #[test]
    fn test_fragment_error_names_field() {
        let err = FragmentError::MissingAttribute {
            field: "job_url",
            css: "a.base-card__full-link".to_string(),
            attr: "href".to_string(),
        };
        assert!(err.to_string().starts_with("job_url:"));
    }
}
