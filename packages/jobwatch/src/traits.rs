//! Seam traits between the pipeline and its infrastructure.

use async_trait::async_trait;

use crate::error::{DeliveryError, FetchError, StoreError};
use crate::types::{JobPosting, SubscriberId};

/// Retrieves a raw payload from a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Read-side view of subscriptions, as the pipeline consumes them.
///
/// Writes (subscribe/unsubscribe) stay on the concrete stores; the pipeline
/// never mutates subscriptions.
#[async_trait]
pub trait SubscriptionIndex: Send + Sync {
    /// Every distinct keyword with at least one subscriber.
    async fn all_keywords(&self) -> Result<Vec<String>, StoreError>;

    /// Subscribers registered for a keyword.
    async fn subscribers_for(&self, keyword: &str) -> Result<Vec<SubscriberId>, StoreError>;
}

/// Persistent record of job ids that have already been processed.
#[async_trait]
pub trait SeenJobStore: Send + Sync {
    async fn is_seen(&self, job_id: &str) -> Result<bool, StoreError>;

    /// Records a job as processed. Inserting an id that is already present
    /// is not an error; implementations keep the first record and log.
    async fn mark_seen(&self, job: &JobPosting) -> Result<(), StoreError>;
}

/// Delivers one alert message to one recipient.
#[async_trait]
pub trait AlertTransport: Send + Sync {
    async fn send(&self, recipient: SubscriberId, text: &str) -> Result<(), DeliveryError>;
}
