use anyhow::{Context, Result};
use serde_json::json;
use tracing::debug;

use crate::domain::ports::AlertNotifier;

const API_BASE: &str = "https://api.telegram.org";

/// Delivers alert messages through the Telegram Bot API.
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn send_message_url(&self) -> String {
        format!("{API_BASE}/bot{}/sendMessage", self.bot_token)
    }
}

impl AlertNotifier for TelegramNotifier {
    fn send(&self, message: &str) -> Result<()> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&json!({
                "chat_id": self.chat_id,
                "text": message,
            }))
            .send()
            .context("sending Telegram message")?;

        let response = response
            .error_for_status()
            .context("Telegram API rejected the message")?;
        debug!(status = %response.status(), "telegram message delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url_embeds_token() {
        let notifier = TelegramNotifier::new("123:abc", "42");
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
