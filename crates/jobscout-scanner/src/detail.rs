//! Full description lookup for a single listing.

use crate::error::{DetailError, Result};
use crate::fetcher::{PageFetcher, PageSource};
use crate::parser::FieldStrategy;
use jobscout_core::AppConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scraper::Html;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Extract the posting id from a listing URL.
///
/// The id is the text after the last `-` of the final path segment, so
/// `/jobs/view/backend-engineer-at-acme-3812345678?refId=x` yields `3812345678`.
pub fn posting_id(listing_url: &str) -> std::result::Result<String, DetailError> {
    let invalid = || DetailError::InvalidListingUrl(listing_url.to_string());

    let url = Url::parse(listing_url).map_err(|_| invalid())?;
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .ok_or_else(invalid)?;

    let id = segment.rsplit('-').next().unwrap_or(segment);
    if id.is_empty() {
        return Err(invalid());
    }
    Ok(id.to_string())
}

/// Detail page URL for a posting id.
pub fn detail_url(endpoint: &str, id: &str) -> std::result::Result<Url, DetailError> {
    Ok(Url::parse(&format!("{}/{id}", endpoint.trim_end_matches('/')))?)
}

/// Fetches and extracts the expanded description of a listing.
pub struct DetailFetcher {
    source: Arc<dyn PageSource>,
    endpoint: String,
    description: FieldStrategy,
    delay_min: Duration,
    delay_max: Duration,
    rng: Mutex<StdRng>,
}

impl DetailFetcher {
    pub fn new(source: Arc<dyn PageSource>, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            source,
            endpoint: config.source.detail_endpoint.clone(),
            description: FieldStrategy::compile("description", &config.selectors.description)?,
            delay_min: Duration::from_millis(config.pacing.detail_delay_min_ms),
            delay_max: Duration::from_millis(config.pacing.detail_delay_max_ms),
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(&config.source)?;
        Self::new(Arc::new(fetcher), config)
    }

    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Fetch the description for `listing_url`.
    ///
    /// Returns `Ok(None)` when the page has no description block. Every
    /// request is followed by a randomized pause, whether it succeeded or not.
    pub async fn fetch_description(
        &self,
        listing_url: &str,
    ) -> std::result::Result<Option<String>, DetailError> {
        self.fetch_description_with_cancel(listing_url, &CancellationToken::new())
            .await
    }

    /// Like [`Self::fetch_description`], but `cancel` aborts the request
    /// and cuts the trailing pause short.
    pub async fn fetch_description_with_cancel(
        &self,
        listing_url: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<Option<String>, DetailError> {
        let id = posting_id(listing_url)?;
        let url = detail_url(&self.endpoint, &id)?;

        tracing::debug!(%url, "fetching listing detail");
        let fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(DetailError::Cancelled),
            fetched = self.source.fetch(&url) => fetched,
        };
        tokio::select! {
            biased;
            () = cancel.cancelled() => tracing::debug!("detail pause cut short"),
            () = tokio::time::sleep(self.polite_delay()) => {}
        }

        let body = fetched?;
        let document = Html::parse_document(&body);
        let description = self
            .description
            .resolve(document.root_element(), "\n")
            .unwrap_or_else(|e| {
                tracing::debug!(error = %e, "unreadable description block");
                None
            });

        if description.is_none() {
            tracing::debug!(%url, "no description found");
        }
        Ok(description)
    }

    fn polite_delay(&self) -> Duration {
        let max = self.delay_max.max(self.delay_min);
        if self.delay_min == max {
            return max;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(self.delay_min..=max)
    }
}
