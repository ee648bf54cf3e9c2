use crate::error::{Result, ScanError};
use crate::filter::query_pair;
use jobscout_core::SearchFilters;
use url::Url;

/// Listings returned per request by the source.
pub const BATCH_SIZE: usize = 25;

/// Absolute offset of the first batch for a zero-based starting page.
#[must_use]
pub fn start_offset(page: u32) -> usize {
    usize::try_from(page).unwrap_or(usize::MAX).saturating_mul(BATCH_SIZE)
}

/// One fully qualified batch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    url: Url,
    offset: usize,
}

impl PageRequest {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Absolute index of the first listing requested.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Decoded query parameters in emission order.
    pub fn params(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// Builds batch requests against a fixed search endpoint.
///
/// Output depends only on the filters and the offset, so a retried request
/// is byte-identical to the failed one.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    endpoint: Url,
}

impl QueryBuilder {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|source| ScanError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;
        Ok(Self { endpoint })
    }

    /// Build the request for the batch starting at `offset`.
    ///
    /// `offset` is absolute: it already includes the caller's starting page.
    pub fn build(&self, filters: &SearchFilters, offset: usize) -> PageRequest {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();

            let keyword = normalize_spaces(&filters.keyword);
            if !keyword.is_empty() {
                pairs.append_pair("keywords", &keyword);
            }
            let location = normalize_spaces(&filters.location);
            if !location.is_empty() {
                pairs.append_pair("location", &location);
            }

            let coded = [
                query_pair(filters.date_posted),
                query_pair(filters.salary),
                query_pair(filters.experience),
                query_pair(filters.remote),
                query_pair(filters.job_type),
                query_pair(filters.sort_by),
            ];
            for (param, code) in coded.into_iter().flatten() {
                pairs.append_pair(param, code);
            }

            pairs.append_pair("start", &offset.to_string());
        }

        PageRequest { url, offset }
    }
}

fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
