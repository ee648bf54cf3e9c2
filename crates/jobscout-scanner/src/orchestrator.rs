//! Paginated retrieval loop.
//!
//! This module provides the `ScanOrchestrator`, which walks the source batch
//! by batch, retries failed attempts with exponential backoff, enforces the
//! caller's result limit, and decides when to stop.

use crate::error::{FetchError, Result};
use crate::fetcher::{PageFetcher, PageSource};
use crate::parser::ListingParser;
use crate::url_builder::{start_offset, QueryBuilder, BATCH_SIZE};
use jobscout_core::{AppConfig, ListingRecord, PacingConfig, SearchFilters};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Retry and politeness timing for one orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Retry `i` (1-indexed) waits `2^i` of these
    pub backoff_unit: Duration,
    /// Consecutive failures at one offset that end the search
    pub max_consecutive_failures: u32,
    /// Pause after a successful batch, lower bound
    pub politeness_min: Duration,
    /// Pause after a successful batch, upper bound
    pub politeness_max: Duration,
}

impl Pacing {
    #[must_use]
    pub fn from_config(config: &PacingConfig) -> Self {
        Self {
            backoff_unit: Duration::from_millis(config.backoff_unit_ms),
            max_consecutive_failures: config.max_consecutive_failures,
            politeness_min: Duration::from_millis(config.politeness_min_ms),
            politeness_max: Duration::from_millis(config.politeness_max_ms),
        }
    }

    /// Delay before the retry following the `failures`-th consecutive failure.
    #[must_use]
    pub fn backoff_delay(&self, failures: u32) -> Duration {
        let factor = 2u32.checked_pow(failures).unwrap_or(u32::MAX);
        self.backoff_unit.saturating_mul(factor)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_config(&PacingConfig::default())
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A successful batch yielded no records.
    Exhausted,
    /// The caller's limit was reached.
    LimitReached,
    /// Consecutive failures hit the budget; records are partial.
    BudgetExhausted,
    /// The cancellation token fired.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Exhausted => "source exhausted",
            Self::LimitReached => "limit reached",
            Self::BudgetExhausted => "failure budget exhausted",
            Self::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Result of one retrieval call.
///
/// `records` is always usable, even when the search ended early.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Accumulated records in source order
    pub records: Vec<ListingRecord>,
    /// Terminal condition of the loop
    pub stop_reason: StopReason,
    /// Successful batch responses, empty ones included
    pub batches_fetched: u32,
    /// Requests issued, retries included
    pub attempts: u32,
    /// Failure streak at the moment the loop stopped
    pub consecutive_failures: u32,
    /// Most recent failed attempt, if any
    pub last_error: Option<FetchError>,
    /// Offset the loop would have requested next
    pub final_offset: usize,
}

impl SearchOutcome {
    /// Whether the search ended because the source kept failing.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.stop_reason == StopReason::BudgetExhausted
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
    }
}

/// Mutable bookkeeping owned by a single search call.
#[derive(Debug)]
struct FetchState {
    offset: usize,
    consecutive_failures: u32,
    records: Vec<ListingRecord>,
    attempts: u32,
    batches_fetched: u32,
    last_error: Option<FetchError>,
}

impl FetchState {
    fn new(offset: usize) -> Self {
        Self {
            offset,
            consecutive_failures: 0,
            records: Vec::new(),
            attempts: 0,
            batches_fetched: 0,
            last_error: None,
        }
    }

    fn finish(self, stop_reason: StopReason) -> SearchOutcome {
        SearchOutcome {
            records: self.records,
            stop_reason,
            batches_fetched: self.batches_fetched,
            attempts: self.attempts,
            consecutive_failures: self.consecutive_failures,
            last_error: self.last_error,
            final_offset: self.offset,
        }
    }
}

/// What the loop does after handling one attempt.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// Fetch the next batch after a politeness pause.
    Advance,
    /// Fetch the same batch again after the backoff delay.
    Retry(Duration),
    Stop(StopReason),
}

/// Drives a paginated search over a [`PageSource`].
pub struct ScanOrchestrator {
    /// Where batches come from
    source: Arc<dyn PageSource>,
    queries: QueryBuilder,
    parser: ListingParser,
    pacing: Pacing,
    /// Jitter for politeness pauses
    rng: Mutex<StdRng>,
}

impl ScanOrchestrator {
    /// Create an orchestrator over an arbitrary page source.
    pub fn new(source: Arc<dyn PageSource>, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            source,
            queries: QueryBuilder::new(&config.source.search_endpoint)?,
            parser: ListingParser::new(&config.selectors)?,
            pacing: Pacing::from_config(&config.pacing),
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Create an orchestrator that fetches over HTTP.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(&config.source)?;
        Self::new(Arc::new(fetcher), config)
    }

    /// Use `rng` for politeness jitter.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Run a search to completion.
    pub async fn search(&self, filters: &SearchFilters) -> SearchOutcome {
        self.search_with_cancel(filters, &CancellationToken::new())
            .await
    }

    /// Run a search that stops early when `cancel` fires.
    ///
    /// The token is checked before every request, and every request and
    /// pause races against it. Records gathered so far are returned.
    pub async fn search_with_cancel(
        &self,
        filters: &SearchFilters,
        cancel: &CancellationToken,
    ) -> SearchOutcome {
        let mut state = FetchState::new(start_offset(filters.page));
        tracing::debug!(
            location = %filters.location,
            keyword = %filters.keyword,
            limit = filters.limit,
            offset = state.offset,
            "starting search"
        );

        let stop_reason = loop {
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let request = self.queries.build(filters, state.offset);
            state.attempts += 1;

            let fetched = tokio::select! {
                biased;
                () = cancel.cancelled() => break StopReason::Cancelled,
                fetched = self.source.fetch(request.url()) => fetched,
            };

            let step = match fetched {
                Ok(body) => self.on_success(&mut state, filters, &body),
                Err(e) => self.on_failure(&mut state, e),
            };

            let pause = match step {
                Step::Stop(reason) => break reason,
                Step::Advance => self.politeness_delay(),
                Step::Retry(delay) => delay,
            };

            if !pause.is_zero() {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break StopReason::Cancelled,
                    () = tokio::time::sleep(pause) => {}
                }
            }
        };

        let outcome = state.finish(stop_reason);
        tracing::info!(
            records = outcome.records.len(),
            batches = outcome.batches_fetched,
            attempts = outcome.attempts,
            reason = %outcome.stop_reason,
            "search finished"
        );
        outcome
    }

    fn on_success(&self, state: &mut FetchState, filters: &SearchFilters, body: &str) -> Step {
        state.consecutive_failures = 0;
        state.batches_fetched += 1;

        let batch = self.parser.parse(body);
        tracing::debug!(offset = state.offset, records = batch.len(), "batch parsed");

        if batch.is_empty() {
            return Step::Stop(StopReason::Exhausted);
        }

        state.records.extend(batch);
        if filters.limit_reached(state.records.len()) {
            state.records.truncate(filters.limit);
            return Step::Stop(StopReason::LimitReached);
        }

        state.offset += BATCH_SIZE;
        Step::Advance
    }

    fn on_failure(&self, state: &mut FetchState, error: FetchError) -> Step {
        state.consecutive_failures += 1;
        tracing::warn!(
            offset = state.offset,
            failures = state.consecutive_failures,
            max = self.pacing.max_consecutive_failures,
            error = %error,
            "batch fetch failed"
        );
        state.last_error = Some(error);

        if state.consecutive_failures >= self.pacing.max_consecutive_failures {
            return Step::Stop(StopReason::BudgetExhausted);
        }
        Step::Retry(self.pacing.backoff_delay(state.consecutive_failures))
    }

    fn politeness_delay(&self) -> Duration {
        let min = self.pacing.politeness_min;
        let max = self.pacing.politeness_max.max(min);
        if min == max {
            return min;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(min..=max)
    }
}
