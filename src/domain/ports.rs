use crate::domain::market::timeframe::Timeframe;
use crate::domain::market::types::CandleSeries;
use anyhow::Result;

/// Source of complete, static candle series, one per (symbol, timeframe).
pub trait MarketDataSource {
    fn load_series(&self, symbol: &str, timeframe: Timeframe) -> Result<CandleSeries>;
}

/// Delivery channel for rendered alert messages.
///
/// Implementations must report failure instead of swallowing it: the
/// pipeline relies on the result to decide whether an alert identifier gets
/// recorded.
pub trait AlertNotifier {
    fn send(&self, message: &str) -> Result<()>;
}

/// Durable, append-only set of alert identifiers already sent.
pub trait AlertStore {
    fn contains(&self, alert_id: &str) -> bool;
    fn add(&mut self, alert_id: &str) -> Result<()>;
}
