//! Result rendering for the terminal.

use jobscout_core::ListingRecord;
use jobscout_scanner::{Classification, Sponsorship};
use serde::Serialize;
use std::fmt::Write as _;

const RULE: &str = "------------------------------------------------------------";

/// A listing as printed, with its classification when one was requested.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(flatten)]
    pub record: ListingRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa_sponsorship: Option<Sponsorship>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl Listing {
    pub fn plain(record: ListingRecord) -> Self {
        Self {
            record,
            visa_sponsorship: None,
            keywords: Vec::new(),
        }
    }

    pub fn classified(record: ListingRecord, classification: Classification) -> Self {
        Self {
            record,
            visa_sponsorship: Some(classification.sponsorship),
            keywords: classification.keywords,
        }
    }
}

/// Human-readable listing block.
pub fn render_text(listings: &[Listing]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Found {} job(s).", listings.len());
    let _ = writeln!(out, "{RULE}");

    for listing in listings {
        let record = &listing.record;
        let _ = writeln!(out, "Title: {}", record.position);
        let _ = writeln!(
            out,
            "Company: {}  |  Location: {}",
            record.company, record.location
        );
        let _ = writeln!(out, "Posted: {}  |  URL: {}", record.ago_time, record.job_url);
        if record.salary_specified() {
            let _ = writeln!(out, "Salary: {}", record.salary);
        }
        if let Some(sponsorship) = listing.visa_sponsorship {
            let _ = writeln!(out, "Visa sponsorship: {sponsorship}");
        }
        if !listing.keywords.is_empty() {
            let _ = writeln!(out, "Applies via: {}", listing.keywords.join(", "));
        }
        let _ = writeln!(out, "{RULE}");
    }
    out
}

pub fn render_json(listings: &[Listing]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscout_core::SALARY_NOT_SPECIFIED;

    fn record() -> ListingRecord {
        ListingRecord {
            position: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            date: "2024-03-05".to_string(),
            ago_time: "2 weeks ago".to_string(),
            salary: SALARY_NOT_SPECIFIED.to_string(),
            job_url: "https://www.linkedin.com/jobs/view/backend-engineer-42".to_string(),
            company_logo: None,
        }
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&[Listing::plain(record())]);

        assert!(text.starts_with("Found 1 job(s)."));
        assert!(text.contains("Title: Backend Engineer"));
        assert!(text.contains("Company: Acme  |  Location: Remote"));
        assert!(text.contains("Posted: 2 weeks ago  |  URL: https://www.linkedin.com/jobs/view/backend-engineer-42"));
        assert!(!text.contains("Salary:"));
        assert!(!text.contains("Visa sponsorship"));
    }

    #[test]
    fn test_render_text_classified() {
        let listing = Listing::classified(
            record(),
            Classification {
                sponsorship: Sponsorship::Yes,
                keywords: vec!["Greenhouse".to_string()],
            },
        );
        let text = render_text(&[listing]);

        assert!(text.contains("Visa sponsorship: yes"));
        assert!(text.contains("Applies via: Greenhouse"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&[Listing::plain(record())]).expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        let first = &value[0];
        assert_eq!(first["position"], "Backend Engineer");
        assert_eq!(first["agoTime"], "2 weeks ago");
        assert_eq!(first["jobUrl"], "https://www.linkedin.com/jobs/view/backend-engineer-42");
        assert!(first.get("visaSponsorship").is_none());
    }

    #[test]
    fn test_render_json_classified() {
        let listing = Listing::classified(
            record(),
            Classification {
                sponsorship: Sponsorship::Yes,
                keywords: Vec::new(),
            },
        );
        let json = render_json(&[listing]).expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value[0]["visaSponsorship"], "yes");
        assert!(value[0].get("keywords").is_none());
    }
}
