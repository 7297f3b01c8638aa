use clap::Parser;
use engine::types::MonitorConfig;

/// Base assets excluded from the universe by default: pegged/stable coins
/// whose price never produces a meaningful momentum signal.
pub const DEFAULT_EXCLUSIONS: &[&str] = &["USDC", "FDUSD", "TUSD", "BUSD", "DAI", "USDP", "EURI"];

#[derive(Debug, Parser)]
#[clap(name = "pulsewatch", version)]
pub struct Cli {
    /// How many top-volume symbols to monitor
    #[clap(long, default_value = "200")]
    pub universe_size: usize,

    /// Quote asset the universe is ranked in
    #[clap(long, default_value = "USDT")]
    pub quote: String,

    /// Base assets to exclude from the universe (comma-separated)
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Kline interval (e.g. 1m, 5m, 1h)
    #[clap(long, default_value = "1m")]
    pub interval: String,

    /// RSI lookback period
    #[clap(long, default_value = "14")]
    pub momentum_period: usize,

    /// Close-price window capacity
    #[clap(long, default_value = "100")]
    pub momentum_capacity: usize,

    /// RSI overbought threshold
    #[clap(long, default_value = "80.0")]
    pub upper_threshold: f64,

    /// RSI oversold threshold
    #[clap(long, default_value = "20.0")]
    pub lower_threshold: f64,

    /// Trailing notional-volume window capacity
    #[clap(long, default_value = "30")]
    pub spike_window: usize,

    /// Spike fires at current >= multiplier x trailing average
    #[clap(long, default_value = "3.0")]
    pub spike_multiplier: f64,

    /// Absolute quote-volume floor a spike must also clear
    #[clap(long, default_value = "50000.0")]
    pub spike_floor: f64,

    /// Symbols backfilled per batch
    #[clap(long, default_value = "10")]
    pub backfill_batch_size: usize,

    /// Pause between backfill batches (ms)
    #[clap(long, default_value = "1000")]
    pub backfill_batch_delay_ms: u64,

    /// Minimum spacing between outbound notifications (ms)
    #[clap(long, default_value = "1100")]
    pub dispatch_cadence_ms: u64,
}

impl Cli {
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            interval: self.interval.clone(),
            momentum_period: self.momentum_period,
            momentum_capacity: self.momentum_capacity,
            upper_threshold: self.upper_threshold,
            lower_threshold: self.lower_threshold,
            spike_window: self.spike_window,
            spike_multiplier: self.spike_multiplier,
            spike_floor: self.spike_floor,
            backfill_batch_size: self.backfill_batch_size,
            backfill_batch_delay_ms: self.backfill_batch_delay_ms,
        }
    }

    pub fn exclusions(&self) -> Vec<String> {
        if self.exclude.is_empty() {
            DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
        } else {
            self.exclude.clone()
        }
    }
}
