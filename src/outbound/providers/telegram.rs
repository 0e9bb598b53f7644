//! Telegram Bot API notifier.
//!
//! Uses the `sendMessage` method with `parse_mode = "HTML"`, so message text
//! is HTML-escaped before it goes on the wire.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::outbound::{ChatNotifier, DeliveryError};

pub const DEFAULT_TELEGRAM_BASE_URL: &str = "https://api.telegram.org";

// ============================================================================
// Bot API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: String,
    parse_mode: &'static str,
}

/// Envelope every Bot API reply is wrapped in.
#[derive(Deserialize, Debug)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Escapes the characters Telegram's HTML parse mode treats as markup.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

// ============================================================================
// Notifier Implementation
// ============================================================================

pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Creates a notifier for one bot and one destination chat.
    ///
    /// # Arguments
    /// * `bot_token` - Token issued by BotFather
    /// * `chat_id` - Destination chat
    /// * `base_url` - Optional custom base URL (defaults to the public Bot API)
    pub fn new(bot_token: String, chat_id: String, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_TELEGRAM_BASE_URL.to_string());
        Self {
            bot_token,
            chat_id,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.bot_token)
    }
}

#[async_trait]
impl ChatNotifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, text: &str) -> Result<(), DeliveryError> {
        if self.bot_token.is_empty() || self.chat_id.is_empty() {
            return Err(DeliveryError::Config(
                "bot token and chat id must both be set".to_string(),
            ));
        }

        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text: escape_html(text),
            parse_mode: "HTML",
        };
        info!("Telegram sendMessage: {} chars", text.chars().count());

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.without_url().to_string()))?;

        let status = response.status();
        debug!("Telegram response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Network(e.without_url().to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<BotApiResponse>(&body)
                .ok()
                .and_then(|r| r.description)
                .unwrap_or(body);
            warn!("Telegram API error: {} - {}", status.as_u16(), message);
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str::<BotApiResponse>(&body) {
            Ok(reply) if !reply.ok => {
                let message = reply
                    .description
                    .unwrap_or_else(|| "request rejected".to_string());
                warn!("Telegram rejected message: {}", message);
                Err(DeliveryError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Unreadable Telegram reply after HTTP {}: {}", status, e);
                Ok(())
            }
        }
    }
}
