//! JobScout Scanner - Paginated listing retrieval.
//!
//! This crate walks a paginated, rate-limited listing source and assembles
//! structured records under caller-supplied filters. Requests are strictly
//! serial: one batch at a time, with exponential backoff after failures and
//! a randomized politeness pause after every successful batch.
//!
//! # Features
//!
//! - Typed filter translation into the source's query codes
//! - Deterministic request URLs, so a retry repeats the exact request
//! - Per-attempt user-agent rotation with an injectable random source
//! - Tolerant extraction: malformed fragments are skipped, never fatal
//! - Global result limit with mid-batch truncation
//! - Cancellation through a `CancellationToken`
//!
//! # Example
//!
//! ```rust,no_run
//! use jobscout_core::{AppConfig, SearchFilters};
//! use jobscout_scanner::ScanOrchestrator;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load_with_env()?;
//! let orchestrator = ScanOrchestrator::from_config(&config)?;
//!
//! let filters = SearchFilters::new("Remote")?
//!     .with_keyword("engineer")
//!     .with_limit(10);
//!
//! let outcome = orchestrator.search(&filters).await;
//! println!("{} records ({})", outcome.records.len(), outcome.stop_reason);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod classify;
#[allow(missing_docs)]
pub mod detail;
#[allow(missing_docs)]
pub mod error;
pub mod fetcher;
#[allow(missing_docs)]
pub mod filter;
#[allow(missing_docs)]
pub mod identity;
#[allow(missing_docs)]
pub mod orchestrator;
#[allow(missing_docs)]
pub mod parser;
#[allow(missing_docs)]
pub mod url_builder;

// Re-export commonly used types
pub use classify::{Classification, PhraseClassifier, PostingClassifier, Sponsorship};
pub use detail::{detail_url, posting_id, DetailFetcher};
pub use error::{DetailError, FetchError, FragmentError, Result, ScanError};
pub use fetcher::{PageFetcher, PageSource};
pub use filter::{query_pair, translate, QueryCode};
pub use identity::UserAgentPool;
pub use orchestrator::{Pacing, ScanOrchestrator, SearchOutcome, StopReason};
pub use parser::ListingParser;
pub use url_builder::{start_offset, PageRequest, QueryBuilder, BATCH_SIZE};
pub use tokio_util::sync::CancellationToken;
