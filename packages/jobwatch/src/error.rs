//! Error taxonomy for the pipeline.
//!
//! Failures are scoped to the layer that produced them: fetch and parse
//! errors stay inside one aggregation task, delivery errors stay inside one
//! notification attempt, and only store errors abort a run.

use thiserror::Error;

/// A fetch task could not produce a payload.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

/// A payload could not be decoded into job postings.
///
/// Individual malformed records are not errors; adapters drop those and
/// keep going. This type covers payloads that are unusable as a whole.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSS selector `{selector}`")]
    Selector { selector: String },
}

/// A persistence operation failed. The only error kind that aborts a run.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A single alert could not be delivered.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("recipient unreachable: {reason}")]
    Unreachable { reason: String },
}
