//! Scheduled daily run using tokio-cron-scheduler.
//!
//! The scheduler owns nothing but the trigger: it fires the pipeline and
//! logs the outcome. Overlap handling lives in the pipeline itself.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::coordinator::Pipeline;

/// Start the daily pipeline run at `alert_time` (`HH:MM`, UTC).
pub async fn start_scheduler(pipeline: Arc<Pipeline>, alert_time: &str) -> Result<JobScheduler> {
    let (hour, minute) = parse_alert_time(alert_time)?;
    let scheduler = JobScheduler::new().await?;

    let cron = format!("0 {minute} {hour} * * *");
    let run_pipeline = pipeline.clone();
    let daily_job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let pipeline = run_pipeline.clone();
        Box::pin(async move {
            match pipeline.run().await {
                Ok(summary) => tracing::info!(
                    jobs = summary.jobs_aggregated,
                    attempted = summary.notifications_attempted,
                    delivered = summary.notifications_delivered,
                    failed = summary.notifications_failed,
                    "scheduled run finished"
                ),
                Err(e) => tracing::error!("Scheduled run aborted: {}", e),
            }
        })
    })?;

    scheduler.add(daily_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (daily run at {} UTC)", alert_time);
    Ok(scheduler)
}

/// Parse `HH:MM` into (hour, minute).
fn parse_alert_time(alert_time: &str) -> Result<(u8, u8)> {
    let (hour, minute) = alert_time
        .split_once(':')
        .with_context(|| format!("alert time `{alert_time}` is not HH:MM"))?;

    let hour: u8 = hour
        .trim()
        .parse()
        .with_context(|| format!("invalid hour in alert time `{alert_time}`"))?;
    let minute: u8 = minute
        .trim()
        .parse()
        .with_context(|| format!("invalid minute in alert time `{alert_time}`"))?;

    if hour > 23 || minute > 59 {
        bail!("alert time `{alert_time}` is out of range");
    }
    Ok((hour, minute))
}
