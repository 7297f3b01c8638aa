use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::types::{Candle, KlineEvent};

/// High-level abstraction over the external market-data provider.
///
/// The engine only sees this trait; the concrete exchange client lives in
/// the `feed` crate, and tests substitute mock implementations.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Ranked symbol universe: the `limit` symbols quoted in `quote` with
    /// the highest 24h quote volume, minus the excluded base assets.
    /// Failure here is fatal at startup; there is no symbol set to monitor.
    async fn top_symbols(
        &self,
        quote: &str,
        limit: usize,
        exclusions: &[String],
    ) -> anyhow::Result<Vec<String>>;

    /// Historical candles, oldest first, used to seed rolling windows
    /// before live streaming begins. Must not include a still-forming
    /// bucket.
    async fn klines(&self, symbol: &str, interval: &str, limit: usize)
    -> anyhow::Result<Vec<Candle>>;

    /// Stream live candle updates for all `symbols` into `tx`.
    ///
    /// Runs until the process shuts down; the implementation owns
    /// reconnect behavior. Both forming and closed candles may be
    /// forwarded, tagged via `Candle::is_closed`.
    async fn stream_klines(
        &self,
        symbols: Vec<String>,
        interval: String,
        tx: Sender<KlineEvent>,
    ) -> anyhow::Result<()>;
}
