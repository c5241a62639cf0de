use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents different timeframe intervals for market data analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    OneMin,
    FiveMin,
    FifteenMin,
    OneHour,
    FourHour,
    OneDay,
    OneWeek,
    OneMonth,
}

impl Timeframe {
    /// Canonical label used in alert identifiers and configuration
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneMin => "1m",
            Timeframe::FiveMin => "5m",
            Timeframe::FifteenMin => "15m",
            Timeframe::OneHour => "1h",
            Timeframe::FourHour => "4h",
            Timeframe::OneDay => "1d",
            Timeframe::OneWeek => "1wk",
            Timeframe::OneMonth => "1mo",
        }
    }

    /// File stem of the series file the data fetcher writes for this
    /// timeframe. Intraday hourly timeframes are stored under their
    /// minute-count names (60m, 240m).
    pub fn file_stem(&self) -> &'static str {
        match self {
            Timeframe::OneHour => "60m",
            Timeframe::FourHour => "240m",
            other => other.label(),
        }
    }

    /// Returns all available timeframes in ascending order
    pub fn all() -> Vec<Timeframe> {
        vec![
            Timeframe::OneMin,
            Timeframe::FiveMin,
            Timeframe::FifteenMin,
            Timeframe::OneHour,
            Timeframe::FourHour,
            Timeframe::OneDay,
            Timeframe::OneWeek,
            Timeframe::OneMonth,
        ]
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" => Ok(Timeframe::OneMin),
            "5m" | "5min" => Ok(Timeframe::FiveMin),
            "15m" | "15min" => Ok(Timeframe::FifteenMin),
            "1h" | "60m" | "1hour" => Ok(Timeframe::OneHour),
            "4h" | "240m" | "4hour" => Ok(Timeframe::FourHour),
            "1d" | "1day" => Ok(Timeframe::OneDay),
            "1wk" | "1w" | "1week" => Ok(Timeframe::OneWeek),
            "1mo" | "1month" => Ok(Timeframe::OneMonth),
            _ => Err(anyhow!(
                "Invalid timeframe: '{}'. Valid options: 1m, 5m, 15m, 1h, 4h, 1d, 1wk, 1mo",
                s
            )),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
