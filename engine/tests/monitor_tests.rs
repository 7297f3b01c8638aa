use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use engine::alert::MomentumState;
use engine::monitor::{MonitorManager, SymbolMonitor};
use engine::source::MarketSource;
use engine::types::{Candle, KlineEvent, MonitorConfig, PendingAlert};

/// Mock market source: canned backfill per symbol, canned live events,
/// optional per-symbol backfill failure.
struct MockSource {
    backfill: HashMap<String, Vec<Candle>>,
    fail_backfill: HashSet<String>,
    events: Mutex<Option<Vec<KlineEvent>>>,
}

impl MockSource {
    fn new(events: Vec<KlineEvent>) -> Self {
        Self {
            backfill: HashMap::new(),
            fail_backfill: HashSet::new(),
            events: Mutex::new(Some(events)),
        }
    }

    fn with_backfill(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.backfill.insert(symbol.into(), candles);
        self
    }

    fn with_failing_backfill(mut self, symbol: &str) -> Self {
        self.fail_backfill.insert(symbol.into());
        self
    }
}

#[async_trait::async_trait]
impl MarketSource for MockSource {
    async fn top_symbols(
        &self,
        _quote: &str,
        _limit: usize,
        _exclusions: &[String],
    ) -> anyhow::Result<Vec<String>> {
        Ok(self.backfill.keys().cloned().collect())
    }

    async fn klines(
        &self,
        symbol: &str,
        _interval: &str,
        _limit: usize,
    ) -> anyhow::Result<Vec<Candle>> {
        if self.fail_backfill.contains(symbol) {
            anyhow::bail!("simulated backfill outage for {symbol}");
        }
        Ok(self.backfill.get(symbol).cloned().unwrap_or_default())
    }

    async fn stream_klines(
        &self,
        _symbols: Vec<String>,
        _interval: String,
        tx: mpsc::Sender<KlineEvent>,
    ) -> anyhow::Result<()> {
        let events = self.events.lock().await.take().unwrap_or_default();
        for event in events {
            let _ = tx.send(event).await;
        }
        // Dropping tx ends the live feed, which ends the monitor loop.
        Ok(())
    }
}

fn candle(open_time_ms: u64, close: f64, quote_volume: f64, is_closed: bool) -> Candle {
    Candle {
        open_time_ms,
        close,
        volume: 1.0,
        quote_volume,
        is_closed,
    }
}

fn event(symbol: &str, c: Candle) -> KlineEvent {
    KlineEvent {
        symbol: symbol.into(),
        candle: c,
    }
}

/// Small windows so tests stay short; spike disabled via an unreachable floor.
fn momentum_cfg() -> MonitorConfig {
    MonitorConfig {
        momentum_period: 2,
        momentum_capacity: 10,
        upper_threshold: 80.0,
        lower_threshold: 20.0,
        spike_window: 3,
        spike_multiplier: 2.0,
        spike_floor: f64::MAX,
        backfill_batch_size: 2,
        backfill_batch_delay_ms: 0,
        ..MonitorConfig::default()
    }
}

/// Momentum disabled by pushing the thresholds outside [0, 100].
fn spike_cfg() -> MonitorConfig {
    MonitorConfig {
        upper_threshold: 150.0,
        lower_threshold: -1.0,
        spike_window: 4,
        spike_multiplier: 2.0,
        spike_floor: 0.0,
        ..momentum_cfg()
    }
}

async fn run_and_collect(
    source: MockSource,
    cfg: MonitorConfig,
    symbols: Vec<String>,
) -> Vec<PendingAlert> {
    let (alert_tx, mut alert_rx) = mpsc::unbounded_channel();
    let manager = MonitorManager::new(Arc::new(source), cfg, alert_tx);

    manager.run(symbols).await.unwrap();

    let mut alerts = Vec::new();
    while let Some(alert) = alert_rx.recv().await {
        alerts.push(alert);
    }
    alerts
}

#[tokio::test]
async fn sustained_extreme_momentum_alerts_once() {
    // Monotonically rising closes push RSI to 100 and keep it there:
    // the edge fires once, the plateau stays silent.
    let events = (0..8)
        .map(|i| event("AAA", candle(i * 60_000, 100.0 + i as f64, 10.0, true)))
        .collect();

    let alerts = run_and_collect(MockSource::new(events), momentum_cfg(), vec!["AAA".into()]).await;

    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].text.contains("AAA"));
    assert!(alerts[0].text.contains("overbought"));
}

#[tokio::test]
async fn forming_candles_are_ignored() {
    // The forming update carries a volume that would trip the spike
    // detector if it were processed; the closed candle that follows is
    // unremarkable.
    let seed: Vec<Candle> = (0..4)
        .map(|i| candle(i * 60_000, 100.0, 10.0, true))
        .collect();

    let events = vec![
        event("AAA", candle(5 * 60_000, 100.0, 50.0, false)),
        event("AAA", candle(5 * 60_000, 100.0, 15.0, true)),
    ];

    let source = MockSource::new(events).with_backfill("AAA", seed);
    let alerts = run_and_collect(source, spike_cfg(), vec!["AAA".into()]).await;

    assert!(alerts.is_empty());
}

#[tokio::test]
async fn spike_fires_from_seeded_history() {
    // Backfill fills the 4-slot volume window; the first live candle is
    // 2.5x the trailing average.
    let seed: Vec<Candle> = (0..4)
        .map(|i| candle(i * 60_000, 100.0, 10.0, true))
        .collect();

    let events = vec![event("BBB", candle(5 * 60_000, 100.0, 25.0, true))];

    let source = MockSource::new(events).with_backfill("BBB", seed);
    let alerts = run_and_collect(source, spike_cfg(), vec!["BBB".into()]).await;

    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].text.contains("volume spike"));
}

#[tokio::test]
async fn spike_below_multiplier_stays_silent() {
    let seed: Vec<Candle> = (0..4)
        .map(|i| candle(i * 60_000, 100.0, 10.0, true))
        .collect();

    // 15 < 2 x 10
    let events = vec![event("BBB", candle(5 * 60_000, 100.0, 15.0, true))];

    let source = MockSource::new(events).with_backfill("BBB", seed);
    let alerts = run_and_collect(source, spike_cfg(), vec!["BBB".into()]).await;

    assert!(alerts.is_empty());
}

#[tokio::test]
async fn backfill_failure_is_isolated_to_one_symbol() {
    let events = (0..8)
        .map(|i| event("GOOD", candle(i * 60_000, 100.0 + i as f64, 10.0, true)))
        .collect();

    let source = MockSource::new(events).with_failing_backfill("BAD");
    let alerts = run_and_collect(
        source,
        momentum_cfg(),
        vec!["BAD".into(), "GOOD".into()],
    )
    .await;

    // GOOD alerts normally; BAD just starts from an empty window.
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].text.contains("GOOD"));
}

#[tokio::test]
async fn events_for_unmonitored_symbols_are_dropped() {
    let mut events: Vec<KlineEvent> = (0..8)
        .map(|i| event("AAA", candle(i * 60_000, 100.0 + i as f64, 10.0, true)))
        .collect();
    // An extreme ramp for a symbol that is not in the universe.
    for i in 0..8u64 {
        events.push(event("ZZZ", candle(i * 60_000, 10.0 + i as f64 * 50.0, 10.0, true)));
    }

    let alerts = run_and_collect(MockSource::new(events), momentum_cfg(), vec!["AAA".into()]).await;

    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].text.contains("AAA"));
}

#[test]
fn symbols_do_not_share_windows_or_state() {
    let cfg = momentum_cfg();
    let mut a = SymbolMonitor::new("AAA".into(), &cfg);
    let b = SymbolMonitor::new("BBB".into(), &cfg);

    // Drive A deep into the overbought zone.
    let mut fired = Vec::new();
    for i in 0..8u64 {
        fired.extend(a.on_candle(&candle(i * 60_000, 100.0 + i as f64, 10.0, true)));
    }

    assert!(!fired.is_empty());
    assert_eq!(a.momentum_state(), MomentumState::High);

    // B never saw a candle and is completely untouched.
    assert_eq!(b.momentum_state(), MomentumState::Neutral);
    assert_eq!(b.price_window_len(), 0);
}

#[test]
fn seeding_never_emits_alerts() {
    let cfg = momentum_cfg();
    let mut monitor = SymbolMonitor::new("AAA".into(), &cfg);

    // An extreme historical ramp only populates the windows.
    let seed: Vec<Candle> = (0..10)
        .map(|i| candle(i * 60_000, 100.0 + i as f64, 10.0, true))
        .collect();
    monitor.seed(&seed);

    assert_eq!(monitor.price_window_len(), 10);
    assert_eq!(monitor.momentum_state(), MomentumState::Neutral);
}
