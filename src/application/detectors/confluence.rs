use std::cmp;

use crate::domain::market::types::Candle;
use crate::domain::trading::setup::ConfluenceFlags;

/// Trailing window inspected on each higher-timeframe series.
pub const RECENT_BARS: usize = 5;

/// Derives the three confluence flags from a set of higher-timeframe
/// series, OR-ing each check across all of them.
///
/// These checks are coarser than the bar-level detectors used on the entry
/// series. `has_order_block` only counts bearish bodies, with none of the
/// window-extremum validation applied to entry bars. `has_fair_value_gap`
/// compares the window's minimum low
/// against the minimum of the highs shifted back two positions, a
/// window-level approximation rather than a per-bar gap scan. The inverse
/// gap check reads the last two bars only, and like the shifted-high
/// comparison it needs at least three recent bars before it can fire.
pub fn analyze(series_list: &[&[Candle]]) -> ConfluenceFlags {
    let mut flags = ConfluenceFlags::default();

    for series in series_list {
        let recent = &series[series.len().saturating_sub(RECENT_BARS)..];
        if recent.is_empty() {
            continue;
        }

        if recent.iter().any(|c| c.close < c.open) {
            flags.has_order_block = true;
        }

        if recent.len() >= 3 {
            let min_low = recent
                .iter()
                .map(|c| c.low)
                .fold(recent[0].low, cmp::min);
            let min_shifted_high = recent[..recent.len() - 2]
                .iter()
                .map(|c| c.high)
                .fold(recent[0].high, cmp::min);
            if min_low > min_shifted_high {
                flags.has_fair_value_gap = true;
            }

            let last = &recent[recent.len() - 1];
            let prev = &recent[recent.len() - 2];
            if last.high > prev.high && last.low < prev.low {
                flags.has_inverse_fair_value_gap = true;
            }
        }
    }

    flags
}
