//! Binance spot REST client: 24h ticker ranking and historical klines.

use engine::types::Candle;
use serde::Deserialize;
use serde_json::Value;

use crate::error::FeedError;

pub const DEFAULT_REST_URL: &str = "https://api.binance.com";

/// One row of `/api/v3/ticker/24hr`. Only the fields the ranking needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker24h {
    pub symbol: String,
    #[serde(rename = "quoteVolume")]
    pub quote_volume: String,
}

pub struct BinanceRest {
    http: reqwest::Client,
    base_url: String,
}

impl BinanceRest {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_REST_URL.into())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// 24h rolling statistics for every listed symbol.
    pub async fn ticker_24h(&self) -> Result<Vec<Ticker24h>, FeedError> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);

        let tickers = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Ticker24h>>()
            .await?;

        Ok(tickers)
    }

    /// Historical klines, oldest first. The trailing row is the
    /// still-forming bucket; callers decide whether to keep it.
    pub async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, FeedError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = limit.to_string();

        let rows = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Value>>()
            .await?;

        rows.iter().map(parse_kline_row).collect()
    }
}

impl Default for BinanceRest {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one REST kline row:
/// `[open_time, open, high, low, close, volume, close_time, quote_volume, ...]`
/// with prices and volumes encoded as strings.
pub fn parse_kline_row(row: &Value) -> Result<Candle, FeedError> {
    let field_u64 = |i: usize| {
        row.get(i)
            .and_then(Value::as_u64)
            .ok_or_else(|| FeedError::Malformed(format!("kline field {i} is not an integer")))
    };
    let field_f64 = |i: usize| {
        row.get(i)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| FeedError::Malformed(format!("kline field {i} is not a decimal string")))
    };

    Ok(Candle {
        open_time_ms: field_u64(0)?,
        close: field_f64(4)?,
        volume: field_f64(5)?,
        quote_volume: field_f64(7)?,
        is_closed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_rest_kline_row() {
        let row = json!([
            1700000000000u64,
            "42000.10",
            "42100.00",
            "41900.00",
            "42050.55",
            "12.5",
            1700000059999u64,
            "525631.87",
            321,
            "6.0",
            "252000.00",
            "0"
        ]);

        let candle = parse_kline_row(&row).unwrap();
        assert_eq!(candle.open_time_ms, 1_700_000_000_000);
        assert_eq!(candle.close, 42050.55);
        assert_eq!(candle.volume, 12.5);
        assert_eq!(candle.quote_volume, 525_631.87);
        assert!(candle.is_closed);
    }

    #[test]
    fn rejects_a_truncated_row() {
        let row = json!([1700000000000u64, "42000.10"]);

        assert!(matches!(
            parse_kline_row(&row),
            Err(FeedError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_price() {
        let row = json!([
            1700000000000u64,
            "a",
            "b",
            "c",
            "not-a-number",
            "12.5",
            1700000059999u64,
            "525631.87"
        ]);

        assert!(parse_kline_row(&row).is_err());
    }

    #[test]
    fn ticker_rows_deserialize() {
        let raw = r#"[
            {"symbol":"BTCUSDT","quoteVolume":"123456789.5","lastPrice":"42000"},
            {"symbol":"ETHUSDT","quoteVolume":"987654.25","lastPrice":"2200"}
        ]"#;

        let tickers: Vec<Ticker24h> = serde_json::from_str(raw).unwrap();
        assert_eq!(tickers.len(), 2);
        assert_eq!(tickers[0].symbol, "BTCUSDT");
        assert_eq!(tickers[1].quote_volume, "987654.25");
    }
}
