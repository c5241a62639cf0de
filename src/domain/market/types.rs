use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::market::timeframe::Timeframe;

/// A single OHLCV bar.
///
/// The timestamp is kept as the raw text from the series file and parsed
/// only when a bar is actually visited by the session filter, so malformed
/// rows outside the scanned range never fail a scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub timestamp: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: f64,
}

impl Candle {
    /// Strict bullish body. Dojis (close == open) count as bearish.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// Ordered sequence of candles, strictly ascending by timestamp.
pub type CandleSeries = Vec<Candle>;

/// All loaded series for one symbol, keyed by timeframe.
pub type TimeframeSet = HashMap<Timeframe, CandleSeries>;
