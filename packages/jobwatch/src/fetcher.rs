//! HTTP retrieval for source payloads.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use tracing::debug;

use crate::error::FetchError;
use crate::traits::Fetcher;

/// Timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

// Browser-like User-Agent; some boards reject the default client UA.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fetcher backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetch a URL to text. Non-2xx responses are failures; the caller
    /// decides how loudly to report them.
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!(url = %url, "fetching");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_default_timeout() {
        let fetcher = HttpFetcher::new(DEFAULT_TIMEOUT);
        assert!(fetcher.is_ok());
    }

    #[test]
    fn client_is_cloneable_for_task_fanout() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let _clone = fetcher.clone();
    }
}
