use async_trait::async_trait;

use crate::Notifier;

const ENV_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Telegram Bot API sink.
///
/// Sends each alert as one `sendMessage` call. Transient failures surface
/// as errors to the dispatcher, which logs and moves on.
pub struct TelegramNotifier {
    http: reqwest::Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            chat_id,
        }
    }

    /// Build from `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`.
    /// `None` when either is unset, so callers can fall back to console.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var(ENV_TOKEN).ok()?;
        let chat_id = std::env::var(ENV_CHAT_ID).ok()?;
        Some(Self::new(token, chat_id))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> anyhow::Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);

        self.http
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "HTML",
                "disable_web_page_preview": true,
            }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
