//! In-memory test doubles for the pipeline's seams.
//!
//! Exposed as a regular module so integration tests (and downstream crates
//! embedding the pipeline) can drive it without a network or a bot token.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{DeliveryError, FetchError};
use crate::traits::{AlertTransport, Fetcher};
use crate::types::SubscriberId;

/// Fetcher that serves canned payloads keyed by URL and records every call.
#[derive(Clone, Default)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, String>>>,
    failures: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, url: impl Into<String>, payload: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), payload.into());
        self
    }

    /// Make `url` fail with a 503, the way a flaky upstream would.
    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.failures.write().unwrap().insert(url.into());
        self
    }

    /// Delay every fetch, for tests that need a run to stay in flight.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write().unwrap() = Some(delay);
        self
    }

    pub fn fetch_calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn fetch_call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.write().unwrap().push(url.to_string());

        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failures.read().unwrap().contains(url) {
            return Err(FetchError::Status {
                status: 503,
                url: url.to_string(),
            });
        }

        match self.responses.read().unwrap().get(url) {
            Some(payload) => Ok(payload.clone()),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

/// One recorded delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentAlert {
    pub recipient: SubscriberId,
    pub text: String,
    pub delivered: bool,
}

/// Transport that records every attempt and can be told to fail for chosen
/// recipients.
#[derive(Clone, Default)]
pub struct MockTransport {
    failing: Arc<RwLock<HashSet<SubscriberId>>>,
    attempts: Arc<RwLock<Vec<SentAlert>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failing_recipient(self, recipient: SubscriberId) -> Self {
        self.failing.write().unwrap().insert(recipient);
        self
    }

    /// Every attempt, in send order, failures included.
    pub fn attempts(&self) -> Vec<SentAlert> {
        self.attempts.read().unwrap().clone()
    }

    /// Only the attempts that went through.
    pub fn delivered(&self) -> Vec<SentAlert> {
        self.attempts
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.delivered)
            .cloned()
            .collect()
    }

    pub fn delivered_to(&self, recipient: SubscriberId) -> Vec<SentAlert> {
        self.delivered()
            .into_iter()
            .filter(|a| a.recipient == recipient)
            .collect()
    }
}

#[async_trait]
impl AlertTransport for MockTransport {
    async fn send(&self, recipient: SubscriberId, text: &str) -> Result<(), DeliveryError> {
        let fails = self.failing.read().unwrap().contains(&recipient);
        self.attempts.write().unwrap().push(SentAlert {
            recipient,
            text: text.to_string(),
            delivered: !fails,
        });

        if fails {
            return Err(DeliveryError::Unreachable {
                reason: format!("mock transport set to fail for {recipient}"),
            });
        }
        Ok(())
    }
}
