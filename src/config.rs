use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;

use crate::domain::market::session::SessionWindow;
use crate::domain::market::timeframe::Timeframe;

/// Everything the detection pipeline needs, passed in at construction
/// instead of living as literals inside the scan logic.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub symbols: Vec<String>,
    /// The series scanned bar-by-bar for entries.
    pub base_timeframe: Timeframe,
    /// Series loaded per symbol. Must contain `base_timeframe`. A failure
    /// on any of these aborts the symbol even when nothing downstream
    /// reads the series (5m is exactly that case).
    pub load_timeframes: Vec<Timeframe>,
    /// Subset of `load_timeframes` fed to the confluence analyzer, in
    /// ascending coarseness.
    pub confluence_timeframes: Vec<Timeframe>,
    /// Minimum bar count on the base series before a symbol is scanned.
    pub min_history: usize,
    /// Take-profit distance as a multiple of the entry-to-stop distance.
    pub reward_risk: Decimal,
    pub sessions: Vec<SessionWindow>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["NAS100".to_string()],
            base_timeframe: Timeframe::OneMin,
            load_timeframes: vec![
                Timeframe::OneMin,
                Timeframe::FiveMin,
                Timeframe::OneHour,
                Timeframe::FourHour,
                Timeframe::OneDay,
                Timeframe::OneWeek,
                Timeframe::OneMonth,
            ],
            confluence_timeframes: vec![
                Timeframe::OneHour,
                Timeframe::FourHour,
                Timeframe::OneDay,
                Timeframe::OneWeek,
                Timeframe::OneMonth,
            ],
            min_history: 5,
            reward_risk: Decimal::TWO,
            sessions: SessionWindow::killzones(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub scan: ScanConfig,
    pub data_dir: PathBuf,
    pub alert_log_path: PathBuf,
    pub scan_interval_secs: u64,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let symbols_str = env::var("SYMBOLS").unwrap_or_else(|_| "NAS100".to_string());
        let symbols: Vec<String> = symbols_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "ict_data".to_string()));

        let alert_log_path =
            PathBuf::from(env::var("ALERT_LOG_PATH").unwrap_or_else(|_| "alert_log.csv".to_string()));

        let scan_interval_secs = env::var("SCAN_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .context("Failed to parse SCAN_INTERVAL_SECS")?;

        let reward_risk = env::var("REWARD_RISK_RATIO")
            .unwrap_or_else(|_| "2".to_string())
            .parse::<Decimal>()
            .context("Failed to parse REWARD_RISK_RATIO")?;

        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN").ok().filter(|s| !s.is_empty());
        let telegram_chat_id = env::var("TELEGRAM_CHAT_ID").ok().filter(|s| !s.is_empty());

        let scan = ScanConfig {
            symbols,
            reward_risk,
            ..ScanConfig::default()
        };

        Ok(Self {
            scan,
            data_dir,
            alert_log_path,
            scan_interval_secs,
            telegram_bot_token,
            telegram_chat_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_scan_config_is_consistent() {
        let config = ScanConfig::default();

        assert!(config.load_timeframes.contains(&config.base_timeframe));
        for tf in &config.confluence_timeframes {
            assert!(
                config.load_timeframes.contains(tf),
                "{tf} must be loaded to contribute confluence"
            );
        }
        assert!(!config.confluence_timeframes.contains(&config.base_timeframe));
    }

    #[test]
    fn test_default_reward_risk_is_two() {
        assert_eq!(ScanConfig::default().reward_risk, dec!(2));
    }

    #[test]
    fn test_default_sessions_are_the_three_killzones() {
        let sessions = ScanConfig::default().sessions;
        let labels: Vec<&str> = sessions.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, vec!["London", "New York AM", "New York PM"]);
    }

    #[test]
    fn test_default_history_floor() {
        assert_eq!(ScanConfig::default().min_history, 5);
    }
}
