use std::cmp;

use crate::domain::market::types::Candle;

/// Validates the candle at `idx` as an order block over the inclusive
/// three-bar window ending there.
///
/// Bullish candles (close > open) validate when their low is the exact
/// window minimum; bearish candles (dojis included) when their high is the
/// exact window maximum. Equality is exact: a price one tick off the
/// extremum does not validate, and no tolerance is applied.
pub fn is_order_block(candles: &[Candle], idx: usize) -> bool {
    if idx < 2 || idx >= candles.len() {
        return false;
    }
    let candle = &candles[idx];
    let window = &candles[idx - 2..=idx];

    if candle.is_bullish() {
        let window_low = window.iter().map(|c| c.low).fold(candle.low, cmp::min);
        candle.low == window_low
    } else {
        let window_high = window.iter().map(|c| c.high).fold(candle.high, cmp::max);
        candle.high == window_high
    }
}
