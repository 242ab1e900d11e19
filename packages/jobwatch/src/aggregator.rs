//! Concurrent fan-out over (source, keyword) fetch tasks.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, error, info};

use crate::adapters::{SourceConfig, SourceRegistry};
use crate::error::{FetchError, ParseError};
use crate::traits::Fetcher;
use crate::types::JobPosting;

/// What one (source, keyword) task produced. Failure is data here: the merge
/// step logs it and moves on, it never cancels sibling tasks.
struct TaskReport {
    source: String,
    keyword: String,
    outcome: Result<Vec<JobPosting>, TaskFailure>,
}

#[derive(Debug, thiserror::Error)]
enum TaskFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Fans out one fetch+extract task per (source, keyword) and merges the
/// results with a run-scoped id dedup.
pub struct Aggregator {
    registry: SourceRegistry,
    fetcher: Arc<dyn Fetcher>,
}

impl Aggregator {
    pub fn new(registry: SourceRegistry, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { registry, fetcher }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Run every (source, keyword) task concurrently, wait for all of them,
    /// and merge in completion order. The first posting with a given id
    /// wins; later copies (the same job found under another keyword) are
    /// discarded. Never touches persistence and never fails the run.
    pub async fn aggregate(&self, keywords: &[String]) -> Vec<JobPosting> {
        let mut tasks = FuturesUnordered::new();
        for source in self.registry.sources() {
            for keyword in keywords {
                tasks.push(run_task(
                    Arc::clone(&self.fetcher),
                    source.clone(),
                    keyword.clone(),
                ));
            }
        }

        info!(
            tasks = tasks.len(),
            sources = self.registry.len(),
            keywords = keywords.len(),
            "aggregation fan-out"
        );

        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut merged = Vec::new();
        while let Some(report) = tasks.next().await {
            match report.outcome {
                Ok(jobs) => {
                    debug!(
                        source = %report.source,
                        keyword = %report.keyword,
                        jobs = jobs.len(),
                        "task finished"
                    );
                    for job in jobs {
                        if seen_ids.insert(job.id.clone()) {
                            merged.push(job);
                        } else {
                            debug!(job_id = %job.id, "duplicate within run; first occurrence kept");
                        }
                    }
                }
                Err(failure) => {
                    error!(
                        source = %report.source,
                        keyword = %report.keyword,
                        error = %failure,
                        "task failed; contributes zero jobs"
                    );
                }
            }
        }

        info!(jobs = merged.len(), "aggregation merged");
        merged
    }
}

async fn run_task(fetcher: Arc<dyn Fetcher>, source: SourceConfig, keyword: String) -> TaskReport {
    let url = source.search_url(&keyword);
    let outcome = fetch_and_extract(fetcher.as_ref(), &source, &url).await;
    TaskReport {
        source: source.name,
        keyword,
        outcome,
    }
}

async fn fetch_and_extract(
    fetcher: &dyn Fetcher,
    source: &SourceConfig,
    url: &str,
) -> Result<Vec<JobPosting>, TaskFailure> {
    let payload = fetcher.fetch(url).await?;
    Ok(source.extract(&payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ExtractionRule, StructuredRule};
    use crate::testing::MockFetcher;

    fn structured_source(name: &str, url_template: &str) -> SourceConfig {
        SourceConfig {
            name: name.to_string(),
            label: name.to_uppercase(),
            url_template: url_template.to_string(),
            rule: ExtractionRule::Structured(StructuredRule {
                skip: 0,
                id_field: "id".to_string(),
                title_field: "position".to_string(),
                company_field: "company".to_string(),
                link_field: "url".to_string(),
            }),
        }
    }

    fn payload(id: u32, title: &str) -> String {
        format!(r#"[{{"id": {id}, "position": "{title}", "url": "https://x/{id}"}}]"#)
    }

    #[tokio::test]
    async fn merges_jobs_from_all_sources() {
        let registry = SourceRegistry::new(vec![
            structured_source("alpha", "https://alpha.example/api?q={keyword}"),
            structured_source("beta", "https://beta.example/api?q={keyword}"),
        ])
        .unwrap();
        let fetcher = MockFetcher::new()
            .with_response("https://alpha.example/api?q=rust", payload(1, "Rust Engineer"))
            .with_response("https://beta.example/api?q=rust", payload(2, "Rust Developer"));

        let aggregator = Aggregator::new(registry, Arc::new(fetcher));
        let mut jobs = aggregator.aggregate(&["rust".to_string()]).await;
        jobs.sort_by(|a, b| a.id.cmp(&b.id));

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, "alpha_1");
        assert_eq!(jobs[1].id, "beta_2");
    }

    #[tokio::test]
    async fn same_job_under_two_keywords_is_kept_once() {
        let registry = SourceRegistry::new(vec![structured_source(
            "alpha",
            "https://alpha.example/api?q={keyword}",
        )])
        .unwrap();
        let fetcher = MockFetcher::new()
            .with_response("https://alpha.example/api?q=go", payload(9, "Go Engineer"))
            .with_response("https://alpha.example/api?q=engineer", payload(9, "Go Engineer"));

        let aggregator = Aggregator::new(registry, Arc::new(fetcher.clone()));
        let jobs = aggregator
            .aggregate(&["go".to_string(), "engineer".to_string()])
            .await;

        assert_eq!(fetcher.fetch_call_count(), 2);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "alpha_9");
    }

    #[tokio::test]
    async fn repeated_aggregation_never_duplicates_within_a_run() {
        let registry = SourceRegistry::new(vec![structured_source(
            "alpha",
            "https://alpha.example/api",
        )])
        .unwrap();
        // No placeholder in the template: both keyword tasks hit the same
        // URL and return the same posting.
        let fetcher = MockFetcher::new()
            .with_response("https://alpha.example/api", payload(5, "Data Engineer"));

        let aggregator = Aggregator::new(registry, Arc::new(fetcher));
        let jobs = aggregator
            .aggregate(&["data".to_string(), "engineer".to_string()])
            .await;

        assert_eq!(jobs.len(), 1);
    }

    #[tokio::test]
    async fn failing_task_does_not_abort_siblings() {
        let registry = SourceRegistry::new(vec![
            structured_source("alpha", "https://alpha.example/api?q={keyword}"),
            structured_source("beta", "https://beta.example/api?q={keyword}"),
        ])
        .unwrap();
        let fetcher = MockFetcher::new()
            .with_failure("https://alpha.example/api?q=rust")
            .with_response("https://beta.example/api?q=rust", payload(3, "Rust Engineer"));

        let aggregator = Aggregator::new(registry, Arc::new(fetcher));
        let jobs = aggregator.aggregate(&["rust".to_string()]).await;

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "beta_3");
    }

    #[tokio::test]
    async fn unparseable_payload_contributes_zero_jobs() {
        let registry = SourceRegistry::new(vec![
            structured_source("alpha", "https://alpha.example/api?q={keyword}"),
            structured_source("beta", "https://beta.example/api?q={keyword}"),
        ])
        .unwrap();
        let fetcher = MockFetcher::new()
            .with_response("https://alpha.example/api?q=rust", "<html>not json</html>".to_string())
            .with_response("https://beta.example/api?q=rust", payload(4, "Rust Engineer"));

        let aggregator = Aggregator::new(registry, Arc::new(fetcher));
        let jobs = aggregator.aggregate(&["rust".to_string()]).await;

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "beta_4");
    }

    #[tokio::test]
    async fn no_keywords_means_no_fetches() {
        let registry = SourceRegistry::new(vec![structured_source(
            "alpha",
            "https://alpha.example/api?q={keyword}",
        )])
        .unwrap();
        let fetcher = MockFetcher::new();

        let aggregator = Aggregator::new(registry, Arc::new(fetcher.clone()));
        let jobs = aggregator.aggregate(&[]).await;

        assert!(jobs.is_empty());
        assert_eq!(fetcher.fetch_call_count(), 0);
    }
}
