use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{BotError, Result};

const SEND_TIMEOUT_SECONDS: u64 = 10;
/// Telegram rejects longer message texts.
const MAX_MESSAGE_CHARS: usize = 4096;

/// Outbound message channel used by the poll loop.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<()>;
}

/// Bot API envelope, `{"ok": bool, "description": "..."}`
#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends plain-text messages to one fixed chat through the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(api_url: &str, token: &str, chat_id: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| BotError::Telegram(format!("failed to build HTTP client: {}", e.without_url())))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    async fn send_chunk(&self, chunk: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": chunk,
        });

        // The bot token is part of the URL, so it is stripped from every error.
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BotError::Telegram(format!("sendMessage request failed: {}", e.without_url())))?;

        let status = response.status();
        let body: TgResponse = response
            .json()
            .await
            .map_err(|e| BotError::Telegram(format!("sendMessage HTTP {}: {}", status, e.without_url())))?;

        if !body.ok {
            return Err(BotError::Telegram(
                body.description
                    .unwrap_or_else(|| format!("sendMessage failed with HTTP {}", status)),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> Result<()> {
        for chunk in split_message(text, MAX_MESSAGE_CHARS) {
            self.send_chunk(&chunk).await?;
        }
        Ok(())
    }
}

/// Split `text` into pieces of at most `max_chars` characters.
fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(max_chars.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Deliver `message`, logging the outcome. Delivery failures never reach the
/// caller.
pub async fn notify<N: Notifier + ?Sized>(notifier: &N, message: &str) {
    match notifier.send_message(message).await {
        Ok(()) => tracing::debug!("Bot sent message: {}", message),
        Err(e) => tracing::error!("Failed to send message: {}", e),
    }
}
