use async_trait::async_trait;

use crate::Notifier;

/// Stdout sink for local runs and when Telegram credentials are absent.
#[derive(Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, text: &str) -> anyhow::Result<()> {
        println!("🔔 {text}");
        Ok(())
    }
}
