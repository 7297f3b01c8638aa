pub mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use cli::Cli;
use engine::monitor::MonitorManager;
use engine::source::MarketSource;
use feed::BinanceSource;
use notify::{AlertDispatcher, ConsoleNotifier, Notifier, TelegramNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::init_logger("pulsewatch");

    let cli = Cli::parse();
    let cfg = cli.monitor_config();
    let exclusions = cli.exclusions();

    let source = Arc::new(BinanceSource::new());

    // No universe, no process: this is the one fatal startup failure.
    let symbols = source
        .top_symbols(&cli.quote, cli.universe_size, &exclusions)
        .await?;
    tracing::info!(
        symbols = symbols.len(),
        quote = %cli.quote,
        interval = %cfg.interval,
        "universe selected"
    );

    let notifier: Arc<dyn Notifier> = match TelegramNotifier::from_env() {
        Some(telegram) => {
            tracing::info!("using telegram notifier");
            Arc::new(telegram)
        }
        None => {
            tracing::info!("telegram credentials not set, printing alerts to stdout");
            Arc::new(ConsoleNotifier)
        }
    };

    let (dispatcher, _dispatch_handle) = AlertDispatcher::start(
        notifier,
        Duration::from_millis(cli.dispatch_cadence_ms),
    );

    let manager = MonitorManager::new(source, cfg, dispatcher.sender());
    manager.run(symbols).await?;

    Ok(())
}
