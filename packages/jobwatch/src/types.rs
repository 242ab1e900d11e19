//! Core data types shared across the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Chat id of an alert recipient.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SubscriberId(pub i64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One job posting in the normalized shape every source reduces to.
///
/// `id` is globally unique across sources: the source name joined to the
/// source-native id with an underscore, e.g. `remoteok_12345`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: Option<String>,
    pub link: String,
    /// Human-readable source label shown in alerts.
    pub source: String,
}

/// A (subscriber, keyword) pair whose keyword matched a job title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub subscriber: SubscriberId,
    pub keyword: String,
}

/// Counters for one pipeline run. A short-circuited or skipped run reports
/// all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub jobs_aggregated: usize,
    pub notifications_attempted: usize,
    pub notifications_delivered: usize,
    pub notifications_failed: usize,
}

/// Canonical keyword form used everywhere a keyword is stored or compared.
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keyword_trims_and_lowercases() {
        assert_eq!(normalize_keyword("  Rust Engineer "), "rust engineer");
        assert_eq!(normalize_keyword("GO"), "go");
        assert_eq!(normalize_keyword("   "), "");
    }

    #[test]
    fn subscriber_id_displays_as_raw_number() {
        assert_eq!(SubscriberId(42).to_string(), "42");
    }
}
