//! ictscan - headless ICT setup scanner
//!
//! Loads per-symbol candle series from the CSV tree the data fetcher
//! maintains, scans them for killzone setups and pushes deduplicated
//! alerts. Runs forever on a fixed cadence unless `--once` is given; a
//! failed cycle is logged and the next tick runs regardless.
//!
//! # Environment Variables
//! - `SYMBOLS` - comma-separated symbol list (default: NAS100)
//! - `DATA_DIR` - candle CSV root (default: ict_data)
//! - `ALERT_LOG_PATH` - dedup log location (default: alert_log.csv)
//! - `SCAN_INTERVAL_SECS` - seconds between cycles (default: 60)
//! - `REWARD_RISK_RATIO` - take-profit multiple (default: 2)
//! - `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID` - enable Telegram delivery

use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

use ictscan::application::pipeline::ScanPipeline;
use ictscan::config::Config;
use ictscan::domain::ports::AlertNotifier;
use ictscan::infrastructure::data::CsvMarketData;
use ictscan::infrastructure::notify::{ConsoleNotifier, TelegramNotifier};
use ictscan::infrastructure::persistence::CsvAlertLog;

#[derive(Debug, Parser)]
#[command(name = "ictscan", about = "ICT killzone setup scanner")]
struct Args {
    /// Run a single scan cycle and exit.
    #[arg(long)]
    once: bool,

    /// Seconds between scan cycles (overrides SCAN_INTERVAL_SECS).
    #[arg(long)]
    interval: Option<u64>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    info!("ictscan {} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "Symbols: {:?}, data dir: {}, alert log: {}",
        config.scan.symbols,
        config.data_dir.display(),
        config.alert_log_path.display()
    );

    let notifier: Box<dyn AlertNotifier> =
        match (&config.telegram_bot_token, &config.telegram_chat_id) {
            (Some(token), Some(chat_id)) => {
                info!("Notifier: Telegram");
                Box::new(TelegramNotifier::new(token.clone(), chat_id.clone()))
            }
            _ => {
                info!("Notifier: console (no Telegram credentials configured)");
                Box::new(ConsoleNotifier)
            }
        };

    let mut store = CsvAlertLog::open(&config.alert_log_path)?;
    let source = CsvMarketData::new(&config.data_dir);
    let pipeline = ScanPipeline::new(config.scan.clone(), source);

    let interval = Duration::from_secs(args.interval.unwrap_or(config.scan_interval_secs));
    if !args.once {
        info!("Scanning every {:?}. Press Ctrl+C to stop.", interval);
    }

    loop {
        match pipeline.run_scan_cycle(notifier.as_ref(), &mut store) {
            Ok(notified) => info!("scan cycle complete: {} new alerts", notified.len()),
            Err(err) => error!("scan cycle failed: {err:#}"),
        }

        if args.once {
            break;
        }
        thread::sleep(interval);
    }

    Ok(())
}
