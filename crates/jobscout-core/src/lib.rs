//! JobScout Core - Foundation crate for the JobScout workspace.
//!
//! This crate provides shared types, error handling and configuration
//! management that the scanner and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Search filters, filter vocabularies and the listing record
//!
//! # Example
//!
//! ```rust
//! use jobscout_core::{AppConfig, DatePosted, FilterDimension, SearchFilters};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.pacing.max_consecutive_failures, 3);
//!
//! let filters = SearchFilters::new("Remote")?
//!     .with_keyword("engineer")
//!     .with_date_posted(DatePosted::from_label("past week"))
//!     .with_limit(10);
//! assert_eq!(filters.date_posted, DatePosted::PastWeek);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, FieldRule, PacingConfig, SelectorConfig, SourceConfig};
pub use error::{ConfigError, ConfigResult, JobScoutError, Result};
pub use types::{
    DatePosted, ExperienceLevel, FilterDimension, JobType, ListingRecord, RemoteMode,
    SalaryFloor, SearchFilters, SortOrder, SALARY_NOT_SPECIFIED,
};
