//! Binance combined kline WebSocket stream.
//!
//! One connection carries every monitored symbol via the combined-stream
//! endpoint. The loop reconnects forever; a dropped receiver is the only
//! way it stops forwarding.

use std::time::Duration;

use engine::types::{Candle, KlineEvent};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc::Sender;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::error::FeedError;

pub const DEFAULT_WS_URL: &str = "wss://stream.binance.com:9443";

const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Payload of a `kline` stream event (`data.k`).
#[derive(Debug, Deserialize)]
struct KlinePayload {
    #[serde(rename = "t")]
    open_time_ms: u64,
    #[serde(rename = "c")]
    close: String,
    #[serde(rename = "v")]
    volume: String,
    #[serde(rename = "q")]
    quote_volume: String,
    #[serde(rename = "x")]
    is_closed: bool,
}

#[derive(Debug, Deserialize)]
struct KlineMessage {
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "k")]
    kline: KlinePayload,
}

#[derive(Debug, Deserialize)]
struct CombinedMessage {
    #[allow(dead_code)]
    stream: String,
    data: KlineMessage,
}

pub struct KlineWsClient {
    ws_url: String,
}

impl KlineWsClient {
    pub fn new() -> Self {
        Self::with_ws_url(DEFAULT_WS_URL.into())
    }

    pub fn with_ws_url(ws_url: String) -> Self {
        Self { ws_url }
    }

    fn combined_stream_url(&self, symbols: &[String], interval: &str) -> String {
        let streams: Vec<String> = symbols
            .iter()
            .map(|s| format!("{}@kline_{}", s.to_lowercase(), interval))
            .collect();

        format!("{}/stream?streams={}", self.ws_url, streams.join("/"))
    }

    /// Main WebSocket event loop.
    ///
    /// 1. Connect to the combined stream for all symbols (auto-reconnect).
    /// 2. Read every incoming message; answer pings.
    /// 3. Parse kline events and forward them into `tx`.
    /// 4. Malformed messages are logged and dropped; they never affect
    ///    other symbols.
    ///
    /// Returns only when `tx` has no receiver left.
    pub async fn run_ws_loop(
        &self,
        symbols: &[String],
        interval: &str,
        tx: Sender<KlineEvent>,
    ) -> Result<(), FeedError> {
        let url = self.combined_stream_url(symbols, interval);

        loop {
            tracing::info!(symbols = symbols.len(), "connecting to kline stream");

            match connect_async(&url).await {
                Ok((ws, _)) => {
                    tracing::info!("kline stream connected");
                    let (mut write, mut read) = ws.split();

                    while let Some(msg) = read.next().await {
                        let msg = match msg {
                            Ok(m) => m,
                            Err(e) => {
                                tracing::warn!(error = %e, "websocket read error");
                                break;
                            }
                        };

                        match msg {
                            Message::Ping(payload) => {
                                if let Err(e) = write.send(Message::Pong(payload)).await {
                                    tracing::warn!(error = %e, "failed to answer ping");
                                    break;
                                }
                            }
                            Message::Text(raw) => {
                                let event = match parse_stream_message(raw.as_str()) {
                                    Ok(event) => event,
                                    Err(e) => {
                                        tracing::warn!(error = %e, "dropping malformed message");
                                        continue;
                                    }
                                };

                                if tx.send(event).await.is_err() {
                                    tracing::info!("kline receiver gone, stopping stream");
                                    return Ok(());
                                }
                            }
                            _ => {}
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "websocket connection failed"),
            }

            tracing::info!(delay_s = RECONNECT_DELAY.as_secs(), "reconnecting");
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }
}

impl Default for KlineWsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one combined-stream text frame into a `KlineEvent`.
pub fn parse_stream_message(raw: &str) -> Result<KlineEvent, FeedError> {
    let msg: CombinedMessage = serde_json::from_str(raw)?;
    let k = msg.data.kline;

    let close = parse_decimal(&k.close, "k.c")?;
    let volume = parse_decimal(&k.volume, "k.v")?;
    let quote_volume = parse_decimal(&k.quote_volume, "k.q")?;

    Ok(KlineEvent {
        symbol: msg.data.symbol,
        candle: Candle {
            open_time_ms: k.open_time_ms,
            close,
            volume,
            quote_volume,
            is_closed: k.is_closed,
        },
    })
}

fn parse_decimal(s: &str, field: &str) -> Result<f64, FeedError> {
    s.parse::<f64>()
        .map_err(|_| FeedError::Malformed(format!("{field} is not a decimal string: {s:?}")))
}
