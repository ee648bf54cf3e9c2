//! Per-posting sponsorship classification.
//!
//! Classification consumes one finished [`ListingRecord`] plus its detail
//! text and shares no state with the retrieval loop. [`PhraseClassifier`] is
//! the built-in rule set; other backends plug in through
//! [`PostingClassifier`].

use async_trait::async_trait;
use jobscout_core::ListingRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a posting explicitly offers visa sponsorship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sponsorship {
    /// The posting states that sponsorship is offered.
    Yes,
    /// Sponsorship is denied or not mentioned.
    No,
}

impl Sponsorship {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for Sponsorship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Sponsorship label
    pub sponsorship: Sponsorship,
    /// Applicant tracking systems the posting refers to
    pub keywords: Vec<String>,
}

impl Classification {
    /// Label used when no description could be obtained.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            sponsorship: Sponsorship::No,
            keywords: Vec::new(),
        }
    }
}

/// Classifies a finished listing.
#[async_trait]
pub trait PostingClassifier: Send + Sync {
    /// Classify `record` using its detail text, if any was fetched.
    async fn classify(&self, record: &ListingRecord, description: Option<&str>)
        -> Classification;
}

/// Applicant tracking systems reported as keywords, in reporting order.
const TRACKING_SYSTEMS: &[&str] = &[
    "Greenhouse",
    "Lever",
    "Workday",
    "iCIMS",
    "Taleo",
    "SmartRecruiters",
    "Ashby",
    "BambooHR",
    "Jobvite",
];

static DENIAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:no|not|unable\s+to|cannot|can't|won't|will\s+not|does\s+not|doesn't|do\s+not|don't|without)\b[^.\n]{0,60}?\b(?:sponsor\w*|visas?)\b",
    )
    .expect("valid denial regex")
});

static OFFER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:visa|h-?1b)\s+)?sponsorship\s+(?:is\s+)?(?:available|offered|provided)\b|\b(?:we|will|can|able\s+to)\s+(?:\w+\s+){0,2}?sponsor(?:s|ing)?\b|\bsponsor(?:s|ing)?\s+(?:h-?1b|(?:work\s+)?visas?)\b|\b(?:offer|offers|offering|provide|provides|providing)\s+(?:[\w-]+\s+){0,2}?sponsorship\b|\bsponsorship\s*:\s*(?:yes|available)\b",
    )
    .expect("valid offer regex")
});

static TRACKING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(greenhouse|lever|workday|myworkdayjobs|icims|taleo|smartrecruiters|ashby|ashbyhq|bamboohr|jobvite)\b",
    )
    .expect("valid tracking system regex")
});

/// Rule-based classifier.
///
/// Answers [`Sponsorship::Yes`] only on an explicit offer. Any denial wins
/// over an offer elsewhere in the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseClassifier;

impl PhraseClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classify a description synchronously.
    #[must_use]
    pub fn classify_text(&self, description: &str) -> Sponsorship {
        if DENIAL_REGEX.is_match(description) {
            return Sponsorship::No;
        }
        if OFFER_REGEX.is_match(description) {
            return Sponsorship::Yes;
        }
        Sponsorship::No
    }

    /// Tracking systems named in any of `texts`, deduplicated.
    #[must_use]
    pub fn tracking_systems(&self, texts: &[&str]) -> Vec<String> {
        let mut found = [false; TRACKING_SYSTEMS.len()];

        for text in texts {
            for m in TRACKING_REGEX.find_iter(text) {
                let name = canonical_system(m.as_str());
                if let Some(idx) = TRACKING_SYSTEMS.iter().position(|s| *s == name) {
                    found[idx] = true;
                }
            }
        }

        TRACKING_SYSTEMS
            .iter()
            .zip(found)
            .filter(|(_, hit)| *hit)
            .map(|(name, _)| (*name).to_string())
            .collect()
    }
}

fn canonical_system(matched: &str) -> &'static str {
    match matched.to_ascii_lowercase().as_str() {
        "greenhouse" => "Greenhouse",
        "lever" => "Lever",
        "workday" | "myworkdayjobs" => "Workday",
        "icims" => "iCIMS",
        "taleo" => "Taleo",
        "smartrecruiters" => "SmartRecruiters",
        "ashby" | "ashbyhq" => "Ashby",
        "bamboohr" => "BambooHR",
        _ => "Jobvite",
    }
}

#[async_trait]
impl PostingClassifier for PhraseClassifier {
    async fn classify(
        &self,
        record: &ListingRecord,
        description: Option<&str>,
    ) -> Classification {
        let Some(description) = description.filter(|d| !d.trim().is_empty()) else {
            return Classification::unknown();
        };

        let classification = Classification {
            sponsorship: self.classify_text(description),
            keywords: self.tracking_systems(&[description, record.job_url.as_str()]),
        };
        tracing::debug!(
            listing = %record,
            sponsorship = %classification.sponsorship,
            keywords = ?classification.keywords,
            "classified posting"
        );
        classification
    }
}
