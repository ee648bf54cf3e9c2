//! Configuration management for JobScout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/jobscout/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listing source endpoints and request headers
    pub source: SourceConfig,
    /// Backoff, failure budget and politeness delays
    pub pacing: PacingConfig,
    /// Markup extraction rules
    pub selectors: SelectorConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `JOBSCOUT_SEARCH_ENDPOINT`: Override the listing search endpoint
    /// - `JOBSCOUT_TIMEOUT_SECS`: Override the per-request timeout
    /// - `JOBSCOUT_MAX_FAILURES`: Override the consecutive failure budget
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `JOBSCOUT_*` environment overrides in place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("JOBSCOUT_SEARCH_ENDPOINT") {
            if !val.trim().is_empty() {
                tracing::debug!("Override source.search_endpoint from env: {}", val);
                self.source.search_endpoint = val;
            }
        }

        if let Ok(val) = std::env::var("JOBSCOUT_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.source.timeout_secs = secs;
                tracing::debug!("Override source.timeout_secs from env: {}", secs);
            }
        }

        if let Ok(val) = std::env::var("JOBSCOUT_MAX_FAILURES") {
            if let Ok(max) = val.parse() {
                self.pacing.max_consecutive_failures = max;
                tracing::debug!("Override pacing.max_consecutive_failures from env: {}", max);
            }
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        fn invalid(field: &str, reason: &str) -> ConfigError {
            ConfigError::InvalidValue {
                field: field.to_string(),
                reason: reason.to_string(),
            }
        }

        if self.source.search_endpoint.trim().is_empty() {
            return Err(invalid("source.search_endpoint", "must not be empty"));
        }
        if self.source.user_agents.is_empty() {
            return Err(invalid("source.user_agents", "at least one user agent is required"));
        }
        if self.source.timeout_secs == 0 {
            return Err(invalid("source.timeout_secs", "must be greater than zero"));
        }
        if self.pacing.max_consecutive_failures == 0 {
            return Err(invalid("pacing.max_consecutive_failures", "must be at least 1"));
        }
        if self.pacing.politeness_min_ms > self.pacing.politeness_max_ms {
            return Err(invalid(
                "pacing.politeness_min_ms",
                "must not exceed politeness_max_ms",
            ));
        }
        if self.pacing.detail_delay_min_ms > self.pacing.detail_delay_max_ms {
            return Err(invalid(
                "pacing.detail_delay_min_ms",
                "must not exceed detail_delay_max_ms",
            ));
        }
        if self.selectors.item.trim().is_empty() {
            return Err(invalid("selectors.item", "must not be empty"));
        }
        if self.selectors.position.is_empty() || self.selectors.company.is_empty() {
            return Err(invalid(
                "selectors",
                "position and company need at least one rule each",
            ));
        }
        Ok(())
    }

    /// Save configuration to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/jobscout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "jobscout", "jobscout").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Listing source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Paginated listing search endpoint
    pub search_endpoint: String,
    /// Per-posting detail endpoint; the posting id is appended
    pub detail_endpoint: String,
    /// Referer sent with every request
    pub referer: String,
    /// Accept header
    pub accept: String,
    /// Accept-Language header
    pub accept_language: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agents rotated per attempt
    pub user_agents: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            search_endpoint:
                "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search"
                    .to_string(),
            detail_endpoint: "https://www.linkedin.com/jobs-guest/jobs/api/jobPosting".to_string(),
            referer: "https://www.linkedin.com/jobs".to_string(),
            accept: "application/json, text/javascript, */*; q=0.01".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout_secs: 10,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.1 Safari/605.1.15".to_string(),
                "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:90.0) Gecko/20100101 Firefox/90.0".to_string(),
            ],
        }
    }
}

impl SourceConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry and politeness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Backoff time unit; retry `i` waits `2^i` units
    pub backoff_unit_ms: u64,
    /// Consecutive failed attempts after which a search stops
    pub max_consecutive_failures: u32,
    /// Lower bound of the pause after a successful batch
    pub politeness_min_ms: u64,
    /// Upper bound of the pause after a successful batch
    pub politeness_max_ms: u64,
    /// Lower bound of the pause after a detail fetch
    pub detail_delay_min_ms: u64,
    /// Upper bound of the pause after a detail fetch
    pub detail_delay_max_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            backoff_unit_ms: 1000,
            max_consecutive_failures: 3,
            politeness_min_ms: 2000,
            politeness_max_ms: 3000,
            detail_delay_min_ms: 3000,
            detail_delay_max_ms: 5000,
        }
    }
}

/// One way of reading a field out of a listing fragment.
///
/// Without `attr` the matched element's text is used. With `attr` the value
/// of that attribute is used. A `required` rule whose element is present but
/// lacks the attribute marks the whole fragment as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// CSS selector, evaluated inside the fragment
    pub css: String,
    /// Attribute to read instead of the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,
    /// Treat a present element without the attribute as malformed markup
    #[serde(default)]
    pub required: bool,
}

impl FieldRule {
    /// Rule reading the element text.
    #[must_use]
    pub fn text(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            attr: None,
            required: false,
        }
    }

    /// Rule reading an attribute.
    #[must_use]
    pub fn attr(css: impl Into<String>, attr: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            attr: Some(attr.into()),
            required: false,
        }
    }

    /// Mark the rule as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Extraction rules for listing fragments and detail pages.
///
/// Each field holds an ordered list of rules; the first one producing a
/// non-empty value wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Selector for one listing fragment
    pub item: String,
    /// Position title
    pub position: Vec<FieldRule>,
    /// Company name
    pub company: Vec<FieldRule>,
    /// Location text
    pub location: Vec<FieldRule>,
    /// Machine-readable posting date
    pub date: Vec<FieldRule>,
    /// Relative posting time
    pub ago_time: Vec<FieldRule>,
    /// Salary text
    pub salary: Vec<FieldRule>,
    /// Canonical listing URL
    pub job_url: Vec<FieldRule>,
    /// Company logo, lazy-load attribute first
    pub company_logo: Vec<FieldRule>,
    /// Expanded description block on a detail page
    pub description: Vec<FieldRule>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item: "li".to_string(),
            position: vec![FieldRule::text("h3.base-search-card__title")],
            company: vec![FieldRule::text("h4.base-search-card__subtitle")],
            location: vec![FieldRule::text("span.job-search-card__location")],
            date: vec![FieldRule::attr("time.job-search-card__listdate", "datetime").required()],
            ago_time: vec![FieldRule::text("time.job-search-card__listdate")],
            salary: vec![FieldRule::text("span.job-search-card__salary-info")],
            job_url: vec![FieldRule::attr("a.base-card__full-link", "href").required()],
            company_logo: vec![
                FieldRule::attr("img.artdeco-entity-image", "data-delayed-url"),
                FieldRule::attr("img.artdeco-entity-image", "src"),
            ],
            description: vec![FieldRule::text("div.show-more-less-html__markup")],
        }
    }
}
