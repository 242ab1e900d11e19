use serde::{Deserialize, Serialize};

/// Request body for the `sendMessage` method.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: String,
    pub disable_web_page_preview: bool,
}

/// Envelope every Bot API call returns.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

/// The slice of a Telegram message we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
}
