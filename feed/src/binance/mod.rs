//! Binance implementation of the engine's `MarketSource` seam.

pub mod rest;
pub mod ws;

use async_trait::async_trait;
use engine::source::MarketSource;
use engine::types::{Candle, KlineEvent};
use tokio::sync::mpsc::Sender;

use rest::{BinanceRest, Ticker24h};
use ws::KlineWsClient;

pub struct BinanceSource {
    rest: BinanceRest,
    ws: KlineWsClient,
}

impl BinanceSource {
    pub fn new() -> Self {
        Self {
            rest: BinanceRest::new(),
            ws: KlineWsClient::new(),
        }
    }

    pub fn with_urls(rest_url: String, ws_url: String) -> Self {
        Self {
            rest: BinanceRest::with_base_url(rest_url),
            ws: KlineWsClient::with_ws_url(ws_url),
        }
    }
}

impl Default for BinanceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketSource for BinanceSource {
    async fn top_symbols(
        &self,
        quote: &str,
        limit: usize,
        exclusions: &[String],
    ) -> anyhow::Result<Vec<String>> {
        let tickers = self.rest.ticker_24h().await?;
        Ok(rank_universe(&tickers, quote, limit, exclusions))
    }

    async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<Candle>> {
        // Request one extra row: the trailing row is the still-forming
        // bucket and must not seed the windows.
        let mut candles = self.rest.klines(symbol, interval, limit + 1).await?;
        candles.pop();
        Ok(candles)
    }

    async fn stream_klines(
        &self,
        symbols: Vec<String>,
        interval: String,
        tx: Sender<KlineEvent>,
    ) -> anyhow::Result<()> {
        self.ws.run_ws_loop(&symbols, &interval, tx).await?;
        Ok(())
    }
}

/// Rank tickers by 24h quote volume, keeping only `quote`-quoted symbols
/// whose base asset is not excluded. Pure so it can be tested without HTTP.
pub fn rank_universe(
    tickers: &[Ticker24h],
    quote: &str,
    limit: usize,
    exclusions: &[String],
) -> Vec<String> {
    let mut ranked: Vec<(f64, &str)> = tickers
        .iter()
        .filter_map(|t| {
            let base = t.symbol.strip_suffix(quote)?;
            if base.is_empty() || exclusions.iter().any(|x| x.as_str() == base) {
                return None;
            }
            let volume = t.quote_volume.parse::<f64>().ok()?;
            Some((volume, t.symbol.as_str()))
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, s)| s.to_string())
        .collect()
}
