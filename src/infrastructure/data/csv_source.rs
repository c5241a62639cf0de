use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;

use crate::domain::market::timeframe::Timeframe;
use crate::domain::market::types::{Candle, CandleSeries};
use crate::domain::ports::MarketDataSource;

/// One row of a series file, as written by the data fetcher.
#[derive(Debug, Deserialize)]
struct CandleRow {
    timestamp: String,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: f64,
}

impl From<CandleRow> for Candle {
    fn from(row: CandleRow) -> Self {
        Candle {
            timestamp: row.timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

/// Loads candle series from the per-symbol CSV tree the data fetcher
/// maintains: `<data_dir>/<symbol>/<stem>.csv`.
pub struct CsvMarketData {
    data_dir: PathBuf,
}

impl CsvMarketData {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn series_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.data_dir
            .join(symbol)
            .join(format!("{}.csv", timeframe.file_stem()))
    }
}

impl MarketDataSource for CsvMarketData {
    fn load_series(&self, symbol: &str, timeframe: Timeframe) -> Result<CandleSeries> {
        let path = self.series_path(symbol, timeframe);
        let file =
            File::open(&path).with_context(|| format!("opening series file {}", path.display()))?;

        let mut reader = csv::Reader::from_reader(file);
        let mut series = CandleSeries::new();
        for row in reader.deserialize::<CandleRow>() {
            let row = row.with_context(|| format!("reading series file {}", path.display()))?;
            series.push(row.into());
        }
        Ok(series)
    }
}
