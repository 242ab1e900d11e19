//! Pipeline coordination: one `run()` is one scheduled execution.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregator::Aggregator;
use crate::error::StoreError;
use crate::matcher::{self, SubscriptionSnapshot};
use crate::notifier::Notifier;
use crate::traits::{AlertTransport, SeenJobStore, SubscriptionIndex};
use crate::types::{JobPosting, RunSummary};

/// State scoped to a single run: correlation id, the subscription snapshot
/// taken at the start, and the counters the run reports.
struct RunContext {
    run_id: Uuid,
    snapshot: SubscriptionSnapshot,
    summary: RunSummary,
}

/// Owns the pipeline stages and drives one run end to end: collect
/// keywords, aggregate, match, notify, persist.
pub struct Pipeline {
    aggregator: Aggregator,
    subscriptions: Arc<dyn SubscriptionIndex>,
    seen: Arc<dyn SeenJobStore>,
    notifier: Notifier,
    run_lock: Mutex<()>,
}

impl Pipeline {
    pub fn new(
        aggregator: Aggregator,
        subscriptions: Arc<dyn SubscriptionIndex>,
        seen: Arc<dyn SeenJobStore>,
        transport: Arc<dyn AlertTransport>,
    ) -> Self {
        Self {
            aggregator,
            subscriptions,
            seen,
            notifier: Notifier::new(transport),
            run_lock: Mutex::new(()),
        }
    }

    /// Execute one run.
    ///
    /// At most one run is in flight per process: a trigger that lands while
    /// another run holds the lock is skipped with a warning and reports an
    /// all-zero summary. Only a store failure aborts a run; jobs already
    /// marked seen stay marked.
    pub async fn run(&self) -> Result<RunSummary, StoreError> {
        let Ok(_guard) = self.run_lock.try_lock() else {
            warn!("previous run still in flight; skipping this trigger");
            return Ok(RunSummary::default());
        };

        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, "run started");

        let keywords = self.subscriptions.all_keywords().await?;
        if keywords.is_empty() {
            info!(run_id = %run_id, "no active subscriptions; nothing to fetch");
            return Ok(RunSummary::default());
        }

        let jobs = self.aggregator.aggregate(&keywords).await;
        if jobs.is_empty() {
            info!(run_id = %run_id, "no jobs found; run finished");
            return Ok(RunSummary::default());
        }

        let mut ctx = RunContext {
            run_id,
            snapshot: self.subscription_snapshot(&keywords).await?,
            summary: RunSummary {
                jobs_aggregated: jobs.len(),
                ..RunSummary::default()
            },
        };

        for job in &jobs {
            self.process_job(&mut ctx, job).await?;
        }

        info!(
            run_id = %ctx.run_id,
            jobs = ctx.summary.jobs_aggregated,
            attempted = ctx.summary.notifications_attempted,
            delivered = ctx.summary.notifications_delivered,
            failed = ctx.summary.notifications_failed,
            "run finished"
        );
        Ok(ctx.summary)
    }

    async fn subscription_snapshot(
        &self,
        keywords: &[String],
    ) -> Result<SubscriptionSnapshot, StoreError> {
        let mut snapshot = SubscriptionSnapshot::new();
        for keyword in keywords {
            let subscribers = self.subscriptions.subscribers_for(keyword).await?;
            if !subscribers.is_empty() {
                snapshot.insert(keyword.clone(), subscribers.into_iter().collect());
            }
        }
        Ok(snapshot)
    }

    /// Match, notify, and persist one job. Already-seen jobs are skipped
    /// outright; zero-match jobs are still marked seen so they are never
    /// rescanned.
    async fn process_job(&self, ctx: &mut RunContext, job: &JobPosting) -> Result<(), StoreError> {
        if self.seen.is_seen(&job.id).await? {
            debug!(run_id = %ctx.run_id, job_id = %job.id, "already seen; skipping");
            return Ok(());
        }

        for m in matcher::matches(job, &ctx.snapshot) {
            ctx.summary.notifications_attempted += 1;
            if self.notifier.notify(m.subscriber, job, &m.keyword).await {
                ctx.summary.notifications_delivered += 1;
            } else {
                ctx.summary.notifications_failed += 1;
            }
        }

        // Marked seen only after every matching subscriber was attempted; a
        // crash before this line re-alerts the job on the next run.
        self.seen.mark_seen(job).await?;
        Ok(())
    }
}
