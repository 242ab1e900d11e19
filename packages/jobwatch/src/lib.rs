//! Keyword-driven job alerts.
//!
//! jobwatch watches remote-job boards for keyword subscriptions: a daily
//! run fans out over every (source, keyword) pair, extracts postings with
//! per-source declarative rules, deduplicates within the run, matches new
//! postings against subscriptions, and delivers Telegram alerts at most
//! once per posting.
//!
//! # Architecture
//!
//! ```text
//! Scheduler (daily, HH:MM UTC)
//!     └─► Pipeline::run
//!             ├─► SubscriptionIndex::all_keywords
//!             ├─► Aggregator::aggregate        (source x keyword fan-out)
//!             │       └─► Fetcher + SourceConfig::extract
//!             └─► per job: is_seen → match → notify → mark_seen
//! ```

pub mod adapters;
pub mod aggregator;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod matcher;
pub mod notifier;
pub mod scheduler;
pub mod storage;
pub mod testing;
pub mod traits;
pub mod types;

pub use adapters::{ExtractionRule, MarkupRule, SourceConfig, SourceRegistry, StructuredRule};
pub use aggregator::Aggregator;
pub use config::Config;
pub use coordinator::Pipeline;
pub use error::{DeliveryError, FetchError, ParseError, StoreError};
pub use fetcher::HttpFetcher;
pub use matcher::SubscriptionSnapshot;
pub use notifier::{format_alert, Notifier};
pub use storage::{MemoryStore, SqliteStore};
pub use traits::{AlertTransport, Fetcher, SeenJobStore, SubscriptionIndex};
pub use types::{normalize_keyword, JobPosting, Match, RunSummary, SubscriberId};
