use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::market::timeframe::Timeframe;

/// Higher-timeframe confluence flags, derived once per symbol per scan
/// cycle and shared unchanged by every setup of that cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfluenceFlags {
    pub has_order_block: bool,
    pub has_fair_value_gap: bool,
    pub has_inverse_fair_value_gap: bool,
}

/// A candidate trade signal produced by the scan. Never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Setup {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub bias: String,
    /// Raw timestamp text of the qualifying bar.
    pub session_timestamp: String,
    pub entry: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub confluence: ConfluenceFlags,
}

impl Setup {
    /// Deterministic deduplication key. Two setups with the same key are the
    /// same alert even when recomputed independently, so the entry price is
    /// pinned to two decimals.
    pub fn alert_id(&self) -> String {
        format!(
            "{}_{}_{}_{:.2}",
            self.symbol,
            self.timeframe,
            self.session_timestamp,
            self.entry.round_dp(2)
        )
    }

    /// Human-facing alert text handed to the notifier.
    pub fn render_alert(&self) -> String {
        format!(
            "\u{1F6A8} ICT Setup Detected\n\
             Asset: {symbol}\n\
             TF: {tf}\n\
             Bias: {bias}\n\
             Killzone Time: {ts}\n\
             Entry: {entry:.2}\n\
             SL: {sl:.2}\n\
             TP: {tp:.2}\n\
             HTF OB: {ob}\n\
             HTF FVG: {fvg}\n\
             HTF IFVG: {ifvg}\n\
             Chart: https://www.tradingview.com/chart/?symbol={symbol}",
            symbol = self.symbol,
            tf = self.timeframe,
            bias = self.bias,
            ts = self.session_timestamp,
            entry = self.entry.round_dp(2),
            sl = self.stop_loss.round_dp(2),
            tp = self.take_profit.round_dp(2),
            ob = self.confluence.has_order_block,
            fvg = self.confluence.has_fair_value_gap,
            ifvg = self.confluence.has_inverse_fair_value_gap,
        )
    }
}
