use uuid::Uuid;

/// One finalized, immutable interval observation for a symbol.
///
/// `is_closed` distinguishes a finished bucket from the still-forming one;
/// only closed candles enter the rolling windows.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time_ms: u64,
    pub close: f64,
    /// Base-asset volume traded in the interval.
    pub volume: f64,
    /// Volume in quote-currency terms (volume x price).
    pub quote_volume: f64,
    pub is_closed: bool,
}

/// A candle update delivered by the live feed, tagged with its symbol.
#[derive(Debug, Clone)]
pub struct KlineEvent {
    pub symbol: String,
    pub candle: Candle,
}

/// An alert waiting in the shared dispatch queue.
///
/// Consumed exactly once, in FIFO enqueue order. The id only exists so
/// delivery logs can be correlated with enqueue logs.
#[derive(Debug, Clone)]
pub struct PendingAlert {
    pub id: Uuid,
    pub text: String,
}

impl PendingAlert {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
        }
    }
}

/// Tuning knobs for the monitoring engine.
///
/// These map one-to-one onto CLI flags; defaults match a 1m-interval setup.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Kline interval identifier understood by the feed (e.g. "1m", "5m").
    pub interval: String,

    /// RSI lookback period.
    pub momentum_period: usize,
    /// Capacity of the per-symbol close-price window.
    pub momentum_capacity: usize,
    /// RSI above this is the overbought zone.
    pub upper_threshold: f64,
    /// RSI below this is the oversold zone.
    pub lower_threshold: f64,

    /// Capacity of the trailing notional-volume window.
    pub spike_window: usize,
    /// Spike fires at `current >= multiplier * trailing mean`.
    pub spike_multiplier: f64,
    /// Absolute notional floor a spike must also clear.
    pub spike_floor: f64,

    /// Symbols backfilled per batch before live streaming starts.
    pub backfill_batch_size: usize,
    /// Pause between backfill batches, to respect provider rate limits.
    pub backfill_batch_delay_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: "1m".into(),
            momentum_period: 14,
            momentum_capacity: 100,
            upper_threshold: 80.0,
            lower_threshold: 20.0,
            spike_window: 30,
            spike_multiplier: 3.0,
            spike_floor: 50_000.0,
            backfill_batch_size: 10,
            backfill_batch_delay_ms: 1_000,
        }
    }
}
