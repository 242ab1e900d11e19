//! Declarative per-source extraction.
//!
//! Each job board is a [`SourceConfig`]: a URL template plus an extraction
//! rule. Rules come in two shapes, selected by a `type` tag when loaded from
//! configuration: `structured` for JSON-array feeds, `markup` for HTML
//! listings. Adapters only transform payloads; fetching is the
//! [`Fetcher`](crate::traits::Fetcher)'s job and nothing here touches
//! persistence.

pub mod markup;
pub mod structured;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::JobPosting;

pub use markup::MarkupRule;
pub use structured::StructuredRule;

/// How to turn one source's payload into job postings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractionRule {
    Structured(StructuredRule),
    Markup(MarkupRule),
}

/// One job board: where to fetch and how to extract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Stable machine name; prefixes every job id from this source, so
    /// renaming a source orphans its seen-job records.
    pub name: String,
    /// Human-readable label shown in alerts.
    pub label: String,
    /// Search URL; `{keyword}` is replaced with the percent-encoded keyword.
    pub url_template: String,
    pub rule: ExtractionRule,
}

impl SourceConfig {
    /// Render the search URL for a keyword. A template without the
    /// `{keyword}` placeholder yields the same URL for every keyword.
    pub fn search_url(&self, keyword: &str) -> String {
        let encoded = urlencoding::encode(keyword);
        self.url_template.replace("{keyword}", &encoded)
    }

    /// Extract job postings from a raw payload.
    pub fn extract(&self, payload: &str) -> Result<Vec<JobPosting>, ParseError> {
        match &self.rule {
            ExtractionRule::Structured(rule) => {
                structured::extract(payload, rule, &self.name, &self.label)
            }
            ExtractionRule::Markup(rule) => {
                markup::extract(payload, rule, &self.name, &self.label)
            }
        }
    }

    fn validate(&self) -> Result<(), ParseError> {
        match &self.rule {
            ExtractionRule::Structured(_) => Ok(()),
            ExtractionRule::Markup(rule) => rule.validate(),
        }
    }
}

/// The set of sources a run fans out over.
///
/// Built explicitly at startup. Markup selectors are validated eagerly so a
/// bad rule fails at boot instead of surfacing mid-run.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<SourceConfig>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<SourceConfig>) -> Result<Self, ParseError> {
        for source in &sources {
            source.validate()?;
        }
        Ok(Self { sources })
    }

    /// The boards this deployment watches.
    pub fn builtin() -> Self {
        let sources = vec![
            SourceConfig {
                name: "remoteok".to_string(),
                label: "RemoteOK (API)".to_string(),
                // Unfiltered feed: every keyword task fetches the same
                // document and the run-scoped dedup collapses the copies.
                url_template: "https://remoteok.com/api".to_string(),
                rule: ExtractionRule::Structured(StructuredRule {
                    skip: 1,
                    id_field: "id".to_string(),
                    title_field: "position".to_string(),
                    company_field: "company".to_string(),
                    link_field: "url".to_string(),
                }),
            },
            SourceConfig {
                name: "wework".to_string(),
                label: "WeWorkRemotely".to_string(),
                url_template: "https://weworkremotely.com/remote-jobs/search?term={keyword}"
                    .to_string(),
                rule: ExtractionRule::Markup(MarkupRule {
                    card: "li.feature".to_string(),
                    id_attr: "id".to_string(),
                    title: "span.title".to_string(),
                    company: "span.company".to_string(),
                    link: "a[href*='/remote-jobs/']".to_string(),
                    link_base: Some("https://weworkremotely.com".to_string()),
                }),
            },
        ];
        Self::new(sources).expect("builtin sources carry known-good selectors")
    }

    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
