use thiserror::Error;

/// Errors raised while scanning a symbol or delivering its alerts.
///
/// `DataUnavailable` and `InsufficientHistory` are skip conditions: the
/// affected symbol sits out the current cycle. `MalformedTimestamp` aborts
/// the symbol's scan outright since it indicates corrupt input.
/// `NotificationFailure` propagates out of the cycle so the identifier is
/// never recorded and the next cycle retries the same alert.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("market data unavailable for {symbol} [{timeframe}]: {reason}")]
    DataUnavailable {
        symbol: String,
        timeframe: String,
        reason: String,
    },

    #[error("insufficient history for {symbol}: {bars} bars on {timeframe}, need at least {min_bars}")]
    InsufficientHistory {
        symbol: String,
        timeframe: String,
        bars: usize,
        min_bars: usize,
    },

    #[error("malformed timestamp '{raw}': {reason}")]
    MalformedTimestamp { raw: String, reason: String },

    #[error("alert notification failed: {reason}")]
    NotificationFailure { reason: String },
}
