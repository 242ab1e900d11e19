//! Alert formatting and delivery.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::error::DeliveryError;
use crate::traits::AlertTransport;
use crate::types::{JobPosting, SubscriberId};

/// Build the Markdown alert for one match.
pub fn format_alert(job: &JobPosting, keyword: &str) -> String {
    let company = job.company.as_deref().unwrap_or("Unknown");
    format!(
        "📢 *New Job Alert: {keyword}*\n\n\
         *Title:* {title}\n\
         *Company:* {company}\n\
         *Source:* {source}\n\n\
         [View Job]({link})",
        keyword = keyword,
        title = job.title,
        company = company,
        source = job.source,
        link = job.link,
    )
}

/// Sends alerts through the configured transport, one attempt per match.
pub struct Notifier {
    transport: Arc<dyn AlertTransport>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn AlertTransport>) -> Self {
        Self { transport }
    }

    /// One delivery attempt. Returns whether the alert went out; a failure
    /// is logged here and never propagates.
    pub async fn notify(&self, subscriber: SubscriberId, job: &JobPosting, keyword: &str) -> bool {
        let message = format_alert(job, keyword);
        match self.transport.send(subscriber, &message).await {
            Ok(()) => {
                debug!(subscriber = %subscriber, job_id = %job.id, keyword, "alert delivered");
                true
            }
            Err(error) => {
                error!(
                    subscriber = %subscriber,
                    job_id = %job.id,
                    error = %error,
                    "failed to deliver alert"
                );
                false
            }
        }
    }
}

#[async_trait]
impl AlertTransport for telegram::TelegramClient {
    async fn send(&self, recipient: SubscriberId, text: &str) -> Result<(), DeliveryError> {
        self.send_message(recipient.0, text)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError::Transport(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    fn job() -> JobPosting {
        JobPosting {
            id: "board_1".to_string(),
            title: "Rust Engineer".to_string(),
            company: Some("Acme".to_string()),
            link: "https://board.example/1".to_string(),
            source: "Board".to_string(),
        }
    }

    #[test]
    fn alert_embeds_keyword_title_company_source_and_link() {
        let text = format_alert(&job(), "rust");
        assert!(text.contains("*New Job Alert: rust*"));
        assert!(text.contains("*Title:* Rust Engineer"));
        assert!(text.contains("*Company:* Acme"));
        assert!(text.contains("*Source:* Board"));
        assert!(text.contains("[View Job](https://board.example/1)"));
    }

    #[test]
    fn missing_company_renders_as_unknown() {
        let mut no_company = job();
        no_company.company = None;
        let text = format_alert(&no_company, "rust");
        assert!(text.contains("*Company:* Unknown"));
    }

    #[tokio::test]
    async fn successful_delivery_returns_true_and_records_the_message() {
        let transport = MockTransport::new();
        let notifier = Notifier::new(Arc::new(transport.clone()));

        assert!(notifier.notify(SubscriberId(7), &job(), "rust").await);

        let attempts = transport.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].recipient, SubscriberId(7));
        assert!(attempts[0].delivered);
        assert!(attempts[0].text.contains("Rust Engineer"));
    }

    #[tokio::test]
    async fn failed_delivery_returns_false_without_propagating() {
        let transport = MockTransport::new().with_failing_recipient(SubscriberId(7));
        let notifier = Notifier::new(Arc::new(transport.clone()));

        assert!(!notifier.notify(SubscriberId(7), &job(), "rust").await);
        assert_eq!(transport.attempts().len(), 1);
        assert!(!transport.attempts()[0].delivered);
    }
}
