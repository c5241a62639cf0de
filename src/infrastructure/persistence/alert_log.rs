use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use crate::domain::ports::AlertStore;

const HEADER: &str = "alert_id";

/// Append-only CSV log of alert identifiers already sent.
///
/// The file is created with its header on first open, only ever grows, and
/// survives restarts. All recorded identifiers are held in memory for
/// lookups; every `add` appends a flushed row before returning.
pub struct CsvAlertLog {
    path: PathBuf,
    seen: HashSet<String>,
}

impl CsvAlertLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            let mut writer = csv::Writer::from_path(&path)
                .with_context(|| format!("creating alert log {}", path.display()))?;
            writer.write_record([HEADER])?;
            writer.flush()?;
            return Ok(Self {
                path,
                seen: HashSet::new(),
            });
        }

        let file = File::open(&path)
            .with_context(|| format!("opening alert log {}", path.display()))?;
        let mut reader = csv::Reader::from_reader(file);
        let mut seen = HashSet::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("reading alert log {}", path.display()))?;
            if let Some(id) = record.get(0) {
                seen.insert(id.to_string());
            }
        }
        Ok(Self { path, seen })
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl AlertStore for CsvAlertLog {
    fn contains(&self, alert_id: &str) -> bool {
        self.seen.contains(alert_id)
    }

    fn add(&mut self, alert_id: &str) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("appending to alert log {}", self.path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record([alert_id])?;
        writer.flush()?;

        self.seen.insert(alert_id.to_string());
        Ok(())
    }
}
