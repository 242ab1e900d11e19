//! Minimal Telegram Bot API client.
//!
//! Covers the single method this workspace needs: `sendMessage` with
//! Markdown formatting and link previews disabled.

pub mod models;

use reqwest::Client;

use crate::models::{ApiResponse, Message, SendMessageRequest};

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("request to Telegram failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram rejected the call ({code}): {description}")]
    Api { code: i64, description: String },
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    token: String,
    api_base: String,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            api_base: API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host. Used by tests that stand in
    /// for the Bot API.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Send a Markdown-formatted message to a chat. Link previews are
    /// disabled so job links do not expand into page cards.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text: text.to_string(),
            parse_mode: "Markdown".to_string(),
            disable_web_page_preview: true,
        };

        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await?;

        let body: ApiResponse<Message> = response.json().await?;
        if !body.ok {
            return Err(TelegramError::Api {
                code: body.error_code.unwrap_or_default(),
                description: body
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        body.result.ok_or_else(|| TelegramError::Api {
            code: 0,
            description: "ok response without a result payload".to_string(),
        })
    }
}
