use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::application::detectors::confluence;
use crate::application::detectors::fvg::{self, GapKind};
use crate::application::detectors::order_block;
use crate::config::ScanConfig;
use crate::domain::errors::ScanError;
use crate::domain::market::session::SessionFilter;
use crate::domain::market::types::{Candle, TimeframeSet};
use crate::domain::ports::{AlertNotifier, AlertStore, MarketDataSource};
use crate::domain::trading::setup::Setup;

/// Bias label stamped on every emitted setup.
const HTF_PD_ARRAY_BIAS: &str = "HTF PD Array";

/// Scans each configured symbol's timeframe set for killzone setups:
/// a bullish fair value gap on the base series, confirmed by an order
/// block on the same bar, annotated with the symbol's higher-timeframe
/// confluence flags.
pub struct ScanPipeline<S> {
    config: ScanConfig,
    source: S,
    sessions: SessionFilter,
}

impl<S: MarketDataSource> ScanPipeline<S> {
    pub fn new(config: ScanConfig, source: S) -> Self {
        let sessions = SessionFilter::new(config.sessions.clone());
        Self {
            config,
            source,
            sessions,
        }
    }

    /// Loads every configured series for one symbol. The first failure
    /// aborts the symbol: no partial setups from half-loaded data.
    fn load_timeframes(&self, symbol: &str) -> Result<TimeframeSet, ScanError> {
        let mut set = TimeframeSet::new();
        for tf in &self.config.load_timeframes {
            let series =
                self.source
                    .load_series(symbol, *tf)
                    .map_err(|e| ScanError::DataUnavailable {
                        symbol: symbol.to_string(),
                        timeframe: tf.to_string(),
                        reason: format!("{e:#}"),
                    })?;
            set.insert(*tf, series);
        }
        Ok(set)
    }

    /// Runs the full per-symbol state machine: load, guard, confluence,
    /// then the ascending bar scan over the base series.
    fn scan_symbol(&self, symbol: &str) -> Result<Vec<Setup>, ScanError> {
        let timeframes = self.load_timeframes(symbol)?;

        let base = timeframes.get(&self.config.base_timeframe).ok_or_else(|| {
            ScanError::DataUnavailable {
                symbol: symbol.to_string(),
                timeframe: self.config.base_timeframe.to_string(),
                reason: "base timeframe missing from load set".to_string(),
            }
        })?;

        if base.len() < self.config.min_history {
            return Err(ScanError::InsufficientHistory {
                symbol: symbol.to_string(),
                timeframe: self.config.base_timeframe.to_string(),
                bars: base.len(),
                min_bars: self.config.min_history,
            });
        }

        // Confluence is computed exactly once per symbol per cycle and
        // broadcast to every setup found below.
        let htf: Vec<&[Candle]> = self
            .config
            .confluence_timeframes
            .iter()
            .filter_map(|tf| timeframes.get(tf).map(|s| s.as_slice()))
            .collect();
        let flags = confluence::analyze(&htf);
        debug!(%symbol, ?flags, "higher-timeframe confluence");

        let mut setups = Vec::new();
        for i in 3..base.len() {
            let bar = &base[i];
            if !self.sessions.is_in_session(&bar.timestamp)? {
                continue;
            }
            // Only the bullish branch of the gap primitive triggers
            // entries; bearish gaps pass through unscanned.
            if fvg::gap_at(base, i) != Some(GapKind::Bullish) {
                continue;
            }
            if !order_block::is_order_block(base, i) {
                continue;
            }

            let entry = bar.close;
            let stop_loss = bar.low;
            let take_profit = entry + (entry - stop_loss) * self.config.reward_risk;
            setups.push(Setup {
                symbol: symbol.to_string(),
                timeframe: self.config.base_timeframe,
                bias: HTF_PD_ARRAY_BIAS.to_string(),
                session_timestamp: bar.timestamp.clone(),
                entry,
                stop_loss,
                take_profit,
                confluence: flags,
            });
        }
        Ok(setups)
    }

    /// Scans all configured symbols, isolating failures at the symbol
    /// boundary: one symbol's bad data never aborts the others.
    pub fn detect_setups(&self) -> Vec<Setup> {
        let mut setups = Vec::new();
        for symbol in &self.config.symbols {
            match self.scan_symbol(symbol) {
                Ok(found) => {
                    if !found.is_empty() {
                        info!(%symbol, count = found.len(), "qualifying bars found");
                    }
                    setups.extend(found);
                }
                Err(err @ ScanError::MalformedTimestamp { .. }) => {
                    error!(%symbol, "scan aborted for symbol: {err}");
                }
                Err(err) => {
                    warn!(%symbol, "symbol skipped: {err}");
                }
            }
        }
        setups
    }

    /// Runs one scan cycle: detect, dedup-gate, notify, record.
    ///
    /// The store write happens strictly after the notification attempt. A
    /// crash between the two leaves the identifier unrecorded and the next
    /// cycle re-notifies the same setup: delivery is at-least-once.
    ///
    /// Returns the setups that were newly notified this cycle, in scan
    /// order. A notification failure propagates immediately without
    /// recording its identifier.
    pub fn run_scan_cycle(
        &self,
        notifier: &dyn AlertNotifier,
        store: &mut dyn AlertStore,
    ) -> Result<Vec<Setup>> {
        let setups = self.detect_setups();
        let mut notified = Vec::new();

        for setup in setups {
            let alert_id = setup.alert_id();
            if store.contains(&alert_id) {
                debug!(%alert_id, "alert already sent, skipping");
                continue;
            }

            notifier
                .send(&setup.render_alert())
                .map_err(|e| ScanError::NotificationFailure {
                    reason: format!("{e:#}"),
                })?;
            store.add(&alert_id)?;
            info!(%alert_id, "alert sent");
            notified.push(setup);
        }

        Ok(notified)
    }
}
