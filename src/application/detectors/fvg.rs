use crate::domain::market::types::Candle;

/// Direction of a three-bar price imbalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapKind {
    Bullish,
    Bearish,
}

/// Classifies the fair value gap ending at `idx`, if any.
///
/// A bullish gap exists when the bar's low clears the high two bars back;
/// a bearish gap when its high stays under the low two bars back. Indices
/// below 2 never gap.
pub fn gap_at(candles: &[Candle], idx: usize) -> Option<GapKind> {
    if idx < 2 || idx >= candles.len() {
        return None;
    }
    let outer = &candles[idx - 2];
    let bar = &candles[idx];

    if bar.low > outer.high {
        Some(GapKind::Bullish)
    } else if bar.high < outer.low {
        Some(GapKind::Bearish)
    } else {
        None
    }
}

/// Scans ascending from index 2 and returns the first bar with a gap in
/// either direction. First match wins; later gaps are not reported.
pub fn find_first_gap(candles: &[Candle]) -> Option<(usize, GapKind)> {
    (2..candles.len()).find_map(|i| gap_at(candles, i).map(|kind| (i, kind)))
}
