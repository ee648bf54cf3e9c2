use crate::error::{FragmentError, Result, ScanError};
use jobscout_core::{FieldRule, ListingRecord, SelectorConfig, SALARY_NOT_SPECIFIED};
use scraper::{ElementRef, Html, Selector};

/// A [`FieldRule`] with its selector compiled.
#[derive(Debug)]
struct CompiledRule {
    css: String,
    selector: Selector,
    attr: Option<String>,
    required: bool,
}

/// Ordered extraction strategies for one field; first non-empty value wins.
#[derive(Debug)]
pub(crate) struct FieldStrategy {
    field: &'static str,
    rules: Vec<CompiledRule>,
}

impl FieldStrategy {
    pub(crate) fn compile(field: &'static str, rules: &[FieldRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let selector =
                    Selector::parse(&rule.css).map_err(|e| ScanError::InvalidSelector {
                        field,
                        css: rule.css.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(CompiledRule {
                    css: rule.css.clone(),
                    selector,
                    attr: rule.attr.clone(),
                    required: rule.required,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { field, rules })
    }

    /// Resolve the field inside `scope`, joining text nodes with `separator`.
    pub(crate) fn resolve(
        &self,
        scope: ElementRef<'_>,
        separator: &str,
    ) -> std::result::Result<Option<String>, FragmentError> {
        for rule in &self.rules {
            let Some(element) = scope.select(&rule.selector).next() else {
                continue;
            };

            let value = match &rule.attr {
                None => collect_text(element, separator),
                Some(attr) => match element.value().attr(attr) {
                    Some(value) => value.trim().to_string(),
                    None if rule.required => {
                        return Err(FragmentError::MissingAttribute {
                            field: self.field,
                            css: rule.css.clone(),
                            attr: attr.clone(),
                        });
                    }
                    None => continue,
                },
            };

            if !value.is_empty() {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// Text nodes of `element` with inner whitespace collapsed, empty ones dropped.
pub(crate) fn collect_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(|chunk| chunk.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Extracts listing records from one batch of search markup.
///
/// Fragments are parsed independently: a malformed fragment is logged and
/// skipped, and a fragment without a title or company is dropped silently.
#[derive(Debug)]
pub struct ListingParser {
    item: Selector,
    position: FieldStrategy,
    company: FieldStrategy,
    location: FieldStrategy,
    date: FieldStrategy,
    ago_time: FieldStrategy,
    salary: FieldStrategy,
    job_url: FieldStrategy,
    company_logo: FieldStrategy,
}

impl ListingParser {
    pub fn new(selectors: &SelectorConfig) -> Result<Self> {
        let item = Selector::parse(&selectors.item).map_err(|e| ScanError::InvalidSelector {
            field: "item",
            css: selectors.item.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            item,
            position: FieldStrategy::compile("position", &selectors.position)?,
            company: FieldStrategy::compile("company", &selectors.company)?,
            location: FieldStrategy::compile("location", &selectors.location)?,
            date: FieldStrategy::compile("date", &selectors.date)?,
            ago_time: FieldStrategy::compile("ago_time", &selectors.ago_time)?,
            salary: FieldStrategy::compile("salary", &selectors.salary)?,
            job_url: FieldStrategy::compile("job_url", &selectors.job_url)?,
            company_logo: FieldStrategy::compile("company_logo", &selectors.company_logo)?,
        })
    }

    /// Parse every fragment in `html`, in document order.
    pub fn parse(&self, html: &str) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();

        for (index, item) in document.select(&self.item).enumerate() {
            match self.parse_item(item) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {
                    tracing::trace!(index, "fragment without title or company, dropping");
                }
                Err(e) => {
                    tracing::debug!(index, error = %e, "skipping malformed fragment");
                }
            }
        }

        records
    }

    fn parse_item(
        &self,
        item: ElementRef<'_>,
    ) -> std::result::Result<Option<ListingRecord>, FragmentError> {
        let position = self.position.resolve(item, " ")?;
        let company = self.company.resolve(item, " ")?;
        let location = self.location.resolve(item, " ")?;
        let date = self.date.resolve(item, " ")?;
        let ago_time = self.ago_time.resolve(item, " ")?;
        let salary = self.salary.resolve(item, " ")?;
        let job_url = self.job_url.resolve(item, " ")?;
        let company_logo = self.company_logo.resolve(item, " ")?;

        let (Some(position), Some(company)) = (position, company) else {
            return Ok(None);
        };

        Ok(Some(ListingRecord {
            position,
            company,
            location: location.unwrap_or_default(),
            date: date.unwrap_or_default(),
            ago_time: ago_time.unwrap_or_default(),
            salary: salary.unwrap_or_else(|| SALARY_NOT_SPECIFIED.to_string()),
            job_url: job_url.unwrap_or_default(),
            company_logo,
        }))
    }
}
