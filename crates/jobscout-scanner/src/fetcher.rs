//! Single-attempt page fetching.
//!
//! A [`PageSource`] performs exactly one request per call and reports a typed
//! outcome. Retrying is the orchestrator's job, so implementations never loop.

use crate::error::{FetchError, Result, ScanError};
use crate::identity::UserAgentPool;
use async_trait::async_trait;
use jobscout_core::SourceConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT,
};
use reqwest::{Client, StatusCode};
use url::Url;

/// Header marking the request as script-issued.
const REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Something that can fetch raw markup for a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Issue one request and return the body.
    ///
    /// # Errors
    /// Returns the classified failure of this single attempt.
    async fn fetch(&self, url: &Url) -> std::result::Result<String, FetchError>;
}

/// HTTP implementation of [`PageSource`] backed by `reqwest`.
pub struct PageFetcher {
    client: Client,
    identities: UserAgentPool,
}

impl PageFetcher {
    /// Create a fetcher from source settings.
    pub fn new(source: &SourceConfig) -> Result<Self> {
        Self::with_rng(source, StdRng::from_entropy())
    }

    /// Create a fetcher whose user-agent rotation uses `rng`.
    pub fn with_rng(source: &SourceConfig, rng: StdRng) -> Result<Self> {
        let client = Client::builder()
            .timeout(source.timeout())
            .default_headers(default_headers(source)?)
            .build()
            .map_err(|e| ScanError::HttpClient(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            identities: UserAgentPool::with_rng(source.user_agents.clone(), rng)?,
        })
    }

    /// Map a response status and body to the fetch outcome.
    pub fn classify(status: StatusCode, body: String) -> std::result::Result<String, FetchError> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if status != StatusCode::OK {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body)
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &Url) -> std::result::Result<String, FetchError> {
        let user_agent = self.identities.pick();
        tracing::debug!(%url, user_agent, "fetching page");

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Self::classify(status, body)
    }
}

fn default_headers(source: &SourceConfig) -> Result<HeaderMap> {
    fn value(name: &str, raw: &str) -> Result<HeaderValue> {
        HeaderValue::from_str(raw)
            .map_err(|e| ScanError::HttpClient(format!("invalid {name} header: {e}")))
    }

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, value("accept", &source.accept)?);
    headers.insert(ACCEPT_LANGUAGE, value("accept-language", &source.accept_language)?);
    headers.insert(REFERER, value("referer", &source.referer)?);
    headers.insert(REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
    Ok(headers)
}
