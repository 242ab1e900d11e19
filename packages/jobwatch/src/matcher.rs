//! Keyword matching over aggregated postings.
//!
//! Pure decision code: no I/O, no logging, exhaustively testable.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{normalize_keyword, JobPosting, Match, SubscriberId};

/// Subscriptions grouped by keyword, snapshotted once at the start of a run.
/// BTree ordering keeps match and notification order deterministic.
pub type SubscriptionSnapshot = BTreeMap<String, BTreeSet<SubscriberId>>;

/// Every (subscriber, keyword) pair whose keyword is a case-insensitive
/// substring of the job title.
///
/// Substring containment only: no tokenization, stemming, or fuzzy logic,
/// so `"go"` happily matches `"Django Developer"`. Keywords that normalize
/// to the empty string never match.
pub fn matches(job: &JobPosting, subscriptions: &SubscriptionSnapshot) -> Vec<Match> {
    let title = job.title.to_lowercase();

    let mut found = Vec::new();
    for (keyword, subscribers) in subscriptions {
        let needle = normalize_keyword(keyword);
        if needle.is_empty() {
            continue;
        }
        if title.contains(&needle) {
            for &subscriber in subscribers {
                found.push(Match {
                    subscriber,
                    keyword: keyword.clone(),
                });
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str) -> JobPosting {
        JobPosting {
            id: "board_1".to_string(),
            title: title.to_string(),
            company: Some("Acme".to_string()),
            link: "https://board.example/1".to_string(),
            source: "Board".to_string(),
        }
    }

    fn snapshot(entries: &[(&str, &[i64])]) -> SubscriptionSnapshot {
        entries
            .iter()
            .map(|(keyword, subscribers)| {
                (
                    keyword.to_string(),
                    subscribers.iter().map(|&id| SubscriberId(id)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn keyword_matches_title_substring() {
        let subs = snapshot(&[("python", &[1])]);
        let found = matches(&job("Senior Python Developer"), &subs);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].subscriber, SubscriberId(1));
        assert_eq!(found[0].keyword, "python");
    }

    #[test]
    fn keyword_is_normalized_before_comparison() {
        let subs = snapshot(&[("PYTHON ", &[1])]);
        let found = matches(&job("Senior Python Developer"), &subs);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn unrelated_keyword_does_not_match() {
        let subs = snapshot(&[("java", &[1])]);
        assert!(matches(&job("Senior Python Developer"), &subs).is_empty());
    }

    #[test]
    fn substring_containment_has_no_word_boundaries() {
        let subs = snapshot(&[("go", &[1])]);
        let found = matches(&job("Django Developer"), &subs);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn every_subscriber_of_a_matching_keyword_is_returned() {
        let subs = snapshot(&[("rust", &[1, 2, 3])]);
        let found = matches(&job("Rust Engineer"), &subs);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn one_job_can_match_several_keywords() {
        let subs = snapshot(&[("engineer", &[1]), ("rust", &[1, 2])]);
        let found = matches(&job("Rust Engineer"), &subs);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].keyword, "engineer");
        assert_eq!(found[1].keyword, "rust");
    }

    #[test]
    fn blank_keyword_never_matches() {
        let subs = snapshot(&[("  ", &[1])]);
        assert!(matches(&job("Anything"), &subs).is_empty());
    }

    #[test]
    fn empty_snapshot_matches_nothing() {
        assert!(matches(&job("Rust Engineer"), &SubscriptionSnapshot::new()).is_empty());
    }
}
