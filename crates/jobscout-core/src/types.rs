//! Shared types used across the JobScout workspace.
//!
//! This module defines the caller-facing search filters, the closed filter
//! vocabularies, and the listing record produced by a retrieval.

use crate::error::JobScoutError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel stored in [`ListingRecord::salary`] when a posting shows no pay.
pub const SALARY_NOT_SPECIFIED: &str = "Not specified";

/// A closed filter vocabulary with an explicit "no constraint" variant.
///
/// Implementors list the human-readable labels they accept. Matching is
/// case-insensitive and ignores surrounding whitespace; empty or unknown
/// labels resolve to [`FilterDimension::UNCONSTRAINED`].
pub trait FilterDimension: Copy + Eq + fmt::Debug + 'static {
    /// Dimension name used in logs.
    const NAME: &'static str;

    /// Variant meaning "do not constrain this dimension".
    const UNCONSTRAINED: Self;

    /// Accepted labels, including aliases.
    const LABELS: &'static [(&'static str, Self)];

    /// Resolve a label, degrading to unconstrained when it is not recognized.
    fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        if normalized.is_empty() {
            return Self::UNCONSTRAINED;
        }

        match Self::LABELS
            .iter()
            .find(|(candidate, _)| *candidate == normalized)
        {
            Some((_, value)) => *value,
            None => {
                tracing::debug!(
                    dimension = Self::NAME,
                    label = %normalized,
                    "unrecognized filter label, treating as unconstrained"
                );
                Self::UNCONSTRAINED
            }
        }
    }

    /// Canonical label for this value (the first matching table entry).
    fn label(self) -> &'static str {
        Self::LABELS
            .iter()
            .find(|(_, value)| *value == self)
            .map_or("", |(label, _)| *label)
    }

    /// Whether this value actually constrains the search.
    fn is_constrained(self) -> bool {
        self != Self::UNCONSTRAINED
    }
}

/// How recently a posting must have been published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePosted {
    /// No time window
    #[default]
    Any,
    /// Posted within the last 24 hours
    Past24Hours,
    /// Posted within the last 7 days
    PastWeek,
    /// Posted within the last 30 days
    PastMonth,
}

impl FilterDimension for DatePosted {
    const NAME: &'static str = "date_posted";
    const UNCONSTRAINED: Self = Self::Any;
    const LABELS: &'static [(&'static str, Self)] = &[
        ("24hr", Self::Past24Hours),
        ("past week", Self::PastWeek),
        ("past month", Self::PastMonth),
    ];
}

/// Employment type of the posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    /// Any employment type
    #[default]
    Any,
    /// Full-time position
    FullTime,
    /// Part-time position
    PartTime,
    /// Contract position
    Contract,
    /// Temporary position
    Temporary,
    /// Internship
    Internship,
    /// Volunteer position
    Volunteer,
}

impl FilterDimension for JobType {
    const NAME: &'static str = "job_type";
    const UNCONSTRAINED: Self = Self::Any;
    const LABELS: &'static [(&'static str, Self)] = &[
        ("full time", Self::FullTime),
        ("full-time", Self::FullTime),
        ("part time", Self::PartTime),
        ("part-time", Self::PartTime),
        ("contract", Self::Contract),
        ("temporary", Self::Temporary),
        ("internship", Self::Internship),
        ("volunteer", Self::Volunteer),
    ];
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteMode {
    /// Any work arrangement
    #[default]
    Any,
    /// On-site only
    OnSite,
    /// Fully remote
    Remote,
    /// Mix of on-site and remote
    Hybrid,
}

impl FilterDimension for RemoteMode {
    const NAME: &'static str = "remote";
    const UNCONSTRAINED: Self = Self::Any;
    const LABELS: &'static [(&'static str, Self)] = &[
        ("on-site", Self::OnSite),
        ("on site", Self::OnSite),
        ("remote", Self::Remote),
        ("hybrid", Self::Hybrid),
    ];
}

/// Seniority of the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// Any seniority
    #[default]
    Any,
    /// Internship level
    Internship,
    /// Entry level
    EntryLevel,
    /// Associate level
    Associate,
    /// Mid-senior level
    Senior,
    /// Director level
    Director,
    /// Executive level
    Executive,
}

impl FilterDimension for ExperienceLevel {
    const NAME: &'static str = "experience";
    const UNCONSTRAINED: Self = Self::Any;
    const LABELS: &'static [(&'static str, Self)] = &[
        ("internship", Self::Internship),
        ("entry level", Self::EntryLevel),
        ("associate", Self::Associate),
        ("senior", Self::Senior),
        ("director", Self::Director),
        ("executive", Self::Executive),
    ];
}

/// Minimum yearly salary bucket, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryFloor {
    /// No salary floor
    #[default]
    Any,
    /// $40k+
    Usd40k,
    /// $60k+
    Usd60k,
    /// $80k+
    Usd80k,
    /// $100k+
    Usd100k,
    /// $120k+
    Usd120k,
}

impl FilterDimension for SalaryFloor {
    const NAME: &'static str = "salary";
    const UNCONSTRAINED: Self = Self::Any;
    const LABELS: &'static [(&'static str, Self)] = &[
        ("40000", Self::Usd40k),
        ("60000", Self::Usd60k),
        ("80000", Self::Usd80k),
        ("100000", Self::Usd100k),
        ("120000", Self::Usd120k),
    ];
}

/// Result ordering requested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Leave ordering to the source
    #[default]
    Default,
    /// Most relevant first
    Relevant,
    /// Most recent first
    Recent,
}

impl FilterDimension for SortOrder {
    const NAME: &'static str = "sort_by";
    const UNCONSTRAINED: Self = Self::Default;
    const LABELS: &'static [(&'static str, Self)] =
        &[("relevant", Self::Relevant), ("recent", Self::Recent)];
}

/// Caller input for one retrieval.
///
/// Built once per call and read-only afterwards. `limit == 0` means the
/// retrieval is bounded only by what the source returns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Free-text keywords (job title, skills)
    pub keyword: String,
    /// Free-text location (city, region, country)
    pub location: String,
    /// Time window
    pub date_posted: DatePosted,
    /// Employment type
    pub job_type: JobType,
    /// Work arrangement
    pub remote: RemoteMode,
    /// Seniority
    pub experience: ExperienceLevel,
    /// Minimum salary bucket
    pub salary: SalaryFloor,
    /// Ordering
    pub sort_by: SortOrder,
    /// Zero-based result page to start from
    pub page: u32,
    /// Maximum number of records to return (0 = unbounded)
    pub limit: usize,
}

impl SearchFilters {
    /// Create filters for a location with every other dimension unconstrained.
    ///
    /// # Errors
    /// Returns error if the location is blank.
    pub fn new(location: impl Into<String>) -> Result<Self, JobScoutError> {
        let filters = Self {
            location: location.into().trim().to_string(),
            ..Self::default()
        };
        filters.validate()?;
        Ok(filters)
    }

    /// Set the keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into().trim().to_string();
        self
    }

    /// Set the time window.
    #[must_use]
    pub fn with_date_posted(mut self, date_posted: DatePosted) -> Self {
        self.date_posted = date_posted;
        self
    }

    /// Set the employment type.
    #[must_use]
    pub fn with_job_type(mut self, job_type: JobType) -> Self {
        self.job_type = job_type;
        self
    }

    /// Set the work arrangement.
    #[must_use]
    pub fn with_remote(mut self, remote: RemoteMode) -> Self {
        self.remote = remote;
        self
    }

    /// Set the seniority.
    #[must_use]
    pub fn with_experience(mut self, experience: ExperienceLevel) -> Self {
        self.experience = experience;
        self
    }

    /// Set the salary floor.
    #[must_use]
    pub fn with_salary(mut self, salary: SalaryFloor) -> Self {
        self.salary = salary;
        self
    }

    /// Set the ordering.
    #[must_use]
    pub fn with_sort_by(mut self, sort_by: SortOrder) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Set the starting page.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the result limit (0 = unbounded).
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Check the invariants a retrieval relies on.
    ///
    /// # Errors
    /// Returns error if the location is blank.
    pub fn validate(&self) -> Result<(), JobScoutError> {
        if self.location.trim().is_empty() {
            return Err(JobScoutError::validation("location", "is required"));
        }
        Ok(())
    }

    /// Whether `count` records satisfy the caller's limit.
    #[must_use]
    pub fn limit_reached(&self, count: usize) -> bool {
        self.limit > 0 && count >= self.limit
    }
}

/// One retrieved job posting.
///
/// Every field except `company_logo` defaults to an empty string when the
/// source fragment lacks it. `job_url` is the identity downstream consumers
/// deduplicate and display by.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// Position title
    pub position: String,
    /// Hiring company
    pub company: String,
    /// Location text as shown by the source
    pub location: String,
    /// Posting date, best-effort ISO format (may be empty)
    pub date: String,
    /// Relative posting time, e.g. "3 days ago"
    pub ago_time: String,
    /// Salary text, or [`SALARY_NOT_SPECIFIED`]
    pub salary: String,
    /// Canonical listing URL
    pub job_url: String,
    /// Company logo URL, if the fragment carried one
    pub company_logo: Option<String>,
}

impl ListingRecord {
    /// Parse the posting date, if it is a plain ISO date.
    #[must_use]
    pub fn posted_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// Whether the salary is the "not specified" sentinel.
    #[must_use]
    pub fn salary_specified(&self) -> bool {
        self.salary != SALARY_NOT_SPECIFIED
    }
}

impl fmt::Display for ListingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.position, self.company)
    }
}
