//! MonitorManager
//!
//! This module runs the streaming alert engine over a fixed symbol universe.
//! Responsibilities:
//!   • Seed each symbol's rolling windows from historical backfill (batched)
//!   • Spawn one worker task per symbol owning that symbol's windows + state
//!   • Route live closed-candle events to the owning worker
//!   • Forward emitted alerts into the shared dispatch queue
//!
//! Each symbol's windows and alert state are owned by exactly one worker
//! task, so ticks for a symbol are processed strictly in arrival order and
//! never race. The only cross-task shared structure is the unbounded alert
//! sender, which is a non-blocking concurrent enqueue by construction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use tokio::sync::mpsc::{self, Receiver, UnboundedSender};

use crate::alert::{MomentumAlert, MomentumAlerter, SpikeAlerter};
use crate::metric::momentum::rsi;
use crate::rolling_window::RollingWindow;
use crate::source::MarketSource;
use crate::types::{Candle, MonitorConfig, PendingAlert};

/// Per-symbol engine: rolling windows, metric computation, alert state.
///
/// Pure with respect to I/O; `on_candle` maps one closed candle to zero or
/// more pending alerts. Exactly one worker task owns each instance.
pub struct SymbolMonitor {
    symbol: String,
    interval: String,
    momentum_period: usize,
    price_window: RollingWindow,
    volume_window: RollingWindow,
    momentum: MomentumAlerter,
    spike: SpikeAlerter,
}

impl SymbolMonitor {
    pub fn new(symbol: String, cfg: &MonitorConfig) -> Self {
        Self {
            symbol,
            interval: cfg.interval.clone(),
            momentum_period: cfg.momentum_period,
            price_window: RollingWindow::new(cfg.momentum_capacity),
            volume_window: RollingWindow::new(cfg.spike_window),
            momentum: MomentumAlerter::new(cfg.upper_threshold, cfg.lower_threshold),
            spike: SpikeAlerter::new(cfg.spike_multiplier, cfg.spike_floor),
        }
    }

    /// Seed the windows from backfilled history without emitting alerts.
    ///
    /// Backfill represents the past; alerting starts with live data.
    pub fn seed(&mut self, candles: &[Candle]) {
        for c in candles.iter().filter(|c| c.is_closed) {
            self.price_window.push(c.close);
            self.volume_window.push(c.quote_volume);
        }
    }

    /// Process one live candle. Forming candles are ignored.
    pub fn on_candle(&mut self, candle: &Candle) -> Vec<PendingAlert> {
        if !candle.is_closed {
            return Vec::new();
        }

        let mut alerts = Vec::new();

        // ---- Momentum ----
        self.price_window.push(candle.close);
        let prices = self.price_window.snapshot();
        let metric = rsi(&prices, self.momentum_period);

        if let Some(alert) = self.momentum.observe(metric) {
            // observe() only fires on a defined metric
            let value = metric.unwrap_or_default();
            alerts.push(PendingAlert::new(self.momentum_text(alert, value, candle)));
        }

        // ---- Volume spike ----
        // Evaluated before the push so the trailing history excludes the
        // current interval.
        let history = self.volume_window.snapshot();
        let full = self.volume_window.is_full();

        if let Some(signal) = self.spike.observe(candle.quote_volume, &history, full) {
            alerts.push(PendingAlert::new(format!(
                "🚨 {} volume spike: {:.0} quote vol = {:.1}x trailing avg ({:.0}) on the {} close at {}",
                self.symbol,
                signal.current,
                signal.ratio,
                signal.trailing_mean,
                self.interval,
                fmt_time(candle.open_time_ms),
            )));
        }

        self.volume_window.push(candle.quote_volume);

        alerts
    }

    fn momentum_text(&self, alert: MomentumAlert, value: f64, candle: &Candle) -> String {
        let zone = match alert {
            MomentumAlert::Overbought => "overbought",
            MomentumAlert::Oversold => "oversold",
        };

        format!(
            "📈 {} RSI({}) = {:.1} — {} on the {} close at {} (price {})",
            self.symbol,
            self.momentum_period,
            value,
            zone,
            self.interval,
            fmt_time(candle.open_time_ms),
            candle.close,
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn momentum_state(&self) -> crate::alert::MomentumState {
        self.momentum.state()
    }

    pub fn price_window_len(&self) -> usize {
        self.price_window.len()
    }
}

fn fmt_time(ts_ms: u64) -> String {
    DateTime::from_timestamp_millis(ts_ms as i64)
        .map(|dt| dt.format("%H:%M UTC").to_string())
        .unwrap_or_else(|| ts_ms.to_string())
}

/// MonitorManager orchestrates backfill seeding, per-symbol workers, and
/// live event routing against a shared alert queue.
pub struct MonitorManager<M> {
    source: Arc<M>,
    cfg: MonitorConfig,
    alert_tx: UnboundedSender<PendingAlert>,
}

impl<M: MarketSource + 'static> MonitorManager<M> {
    /// Create a new MonitorManager wrapped in Arc<Self> for multi-task
    /// ownership.
    pub fn new(
        source: Arc<M>,
        cfg: MonitorConfig,
        alert_tx: UnboundedSender<PendingAlert>,
    ) -> Arc<Self> {
        Arc::new(Self {
            source,
            cfg,
            alert_tx,
        })
    }

    /// Run the engine over a fixed symbol universe until the live feed ends.
    ///
    /// Sequencing: every symbol is backfilled (in rate-limit-friendly
    /// batches) before the live stream starts, so no live event can reach a
    /// symbol whose windows are unseeded. Events for symbols outside the
    /// universe are dropped.
    pub async fn run(self: Arc<Self>, symbols: Vec<String>) -> anyhow::Result<()> {
        let mut workers: HashMap<String, mpsc::Sender<Candle>> = HashMap::new();

        // Backfill needs one extra candle beyond the larger window so the
        // spike history is full on the first live tick.
        let limit = self
            .cfg
            .momentum_capacity
            .max(self.cfg.spike_window + 1);

        let batch_size = self.cfg.backfill_batch_size.max(1);
        let batches = symbols.chunks(batch_size).count();

        for (i, batch) in symbols.chunks(batch_size).enumerate() {
            for symbol in batch {
                let mut monitor = SymbolMonitor::new(symbol.clone(), &self.cfg);

                match self
                    .source
                    .klines(symbol, &self.cfg.interval, limit)
                    .await
                {
                    Ok(candles) => {
                        monitor.seed(&candles);
                        tracing::debug!(
                            symbol = %symbol,
                            candles = candles.len(),
                            "backfill complete"
                        );
                    }
                    Err(e) => {
                        // Isolated failure: this symbol starts with an empty
                        // window and simply alerts later.
                        tracing::warn!(
                            symbol = %symbol,
                            error = %e,
                            "backfill failed, starting with empty window"
                        );
                    }
                }

                let (tx, rx) = mpsc::channel(64);
                workers.insert(symbol.clone(), tx);
                tokio::spawn(run_symbol_worker(monitor, rx, self.alert_tx.clone()));
            }

            if i + 1 < batches {
                tokio::time::sleep(Duration::from_millis(self.cfg.backfill_batch_delay_ms)).await;
            }
        }

        tracing::info!(symbols = workers.len(), "backfill done, starting live stream");

        // Live stream task
        let (event_tx, mut event_rx) = mpsc::channel(1024);
        let source = Arc::clone(&self.source);
        let stream_symbols = symbols.clone();
        let interval = self.cfg.interval.clone();

        tokio::spawn(async move {
            if let Err(e) = source.stream_klines(stream_symbols, interval, event_tx).await {
                tracing::error!(error = %e, "kline stream terminated");
            }
        });

        // Router: fan events out to the owning worker.
        while let Some(event) = event_rx.recv().await {
            match workers.get(&event.symbol) {
                Some(tx) => {
                    if tx.send(event.candle).await.is_err() {
                        tracing::warn!(symbol = %event.symbol, "symbol worker is gone");
                    }
                }
                None => {
                    tracing::debug!(symbol = %event.symbol, "dropping event for unmonitored symbol");
                }
            }
        }

        tracing::warn!("live feed channel closed, monitor loop ending");
        Ok(())
    }
}

/// Worker loop owning one symbol's state. Exits when the router drops its
/// sender or the dispatcher side of the alert queue is gone.
async fn run_symbol_worker(
    mut monitor: SymbolMonitor,
    mut rx: Receiver<Candle>,
    alert_tx: UnboundedSender<PendingAlert>,
) {
    while let Some(candle) = rx.recv().await {
        for alert in monitor.on_candle(&candle) {
            tracing::info!(symbol = %monitor.symbol(), alert_id = %alert.id, "alert queued");

            if alert_tx.send(alert).is_err() {
                tracing::warn!(symbol = %monitor.symbol(), "alert queue closed, stopping worker");
                return;
            }
        }
    }
}
