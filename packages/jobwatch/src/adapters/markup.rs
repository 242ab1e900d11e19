//! Adapter for HTML job listings.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::types::JobPosting;

/// Selector set for an HTML listing page: a `card` selector locating the
/// repeated job blocks, plus per-field sub-selectors applied within each
/// card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupRule {
    pub card: String,
    /// Attribute on the card element holding the source-native id.
    pub id_attr: String,
    pub title: String,
    pub company: String,
    /// Sub-selector for the job link; the first match wins.
    pub link: String,
    /// Prefix for relative hrefs. Cards with a relative href and no base
    /// are dropped.
    #[serde(default)]
    pub link_base: Option<String>,
}

impl MarkupRule {
    /// Parse every selector once, so a stale or mistyped rule fails at
    /// registry construction instead of mid-run.
    pub fn validate(&self) -> Result<(), ParseError> {
        parse_selector(&self.card)?;
        parse_selector(&self.title)?;
        parse_selector(&self.company)?;
        parse_selector(&self.link)?;
        Ok(())
    }
}

pub(super) fn extract(
    payload: &str,
    rule: &MarkupRule,
    name: &str,
    label: &str,
) -> Result<Vec<JobPosting>, ParseError> {
    let card_selector = parse_selector(&rule.card)?;
    let title_selector = parse_selector(&rule.title)?;
    let company_selector = parse_selector(&rule.company)?;
    let link_selector = parse_selector(&rule.link)?;

    let document = Html::parse_document(payload);

    let mut jobs = Vec::new();
    let mut cards = 0usize;
    for card in document.select(&card_selector) {
        cards += 1;

        let id = card
            .value()
            .attr(&rule.id_attr)
            .filter(|v| !v.is_empty());
        let title = card
            .select(&title_selector)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty());
        let link = card
            .select(&link_selector)
            .next()
            .and_then(|el| el.value().attr("href"))
            .and_then(|href| absolutize(href, rule.link_base.as_deref()));

        let (Some(id), Some(title), Some(link)) = (id, title, link) else {
            debug!(source = name, "dropping card missing id/title/link");
            continue;
        };

        let company = card
            .select(&company_selector)
            .next()
            .map(element_text)
            .filter(|c| !c.is_empty());

        jobs.push(JobPosting {
            id: format!("{name}_{id}"),
            title,
            company,
            link,
            source: label.to_string(),
        });
    }

    if cards == 0 {
        warn!(
            source = name,
            selector = %rule.card,
            "no job cards matched; extraction rule may be stale"
        );
    }

    Ok(jobs)
}

fn parse_selector(raw: &str) -> Result<Selector, ParseError> {
    Selector::parse(raw).map_err(|_| ParseError::Selector {
        selector: raw.to_string(),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn absolutize(href: &str, base: Option<&str>) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    base.map(|base| format!("{base}{href}"))
}
