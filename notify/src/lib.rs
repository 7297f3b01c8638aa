pub mod console;
pub mod dispatcher;
pub mod telegram;

use async_trait::async_trait;

pub use console::ConsoleNotifier;
pub use dispatcher::AlertDispatcher;
pub use telegram::TelegramNotifier;

/// Abstraction over the outbound notification channel (Telegram, console).
///
/// Delivery is best-effort: callers log failures and never retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> anyhow::Result<()>;
}
