use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::errors::ScanError;

/// A named daily trading window over local time-of-day. Both ends are
/// inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionWindow {
    pub label: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SessionWindow {
    pub fn new(label: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }

    /// The three killzone sessions setups are considered valid in:
    /// London, New York AM and New York PM.
    pub fn killzones() -> Vec<SessionWindow> {
        vec![
            SessionWindow::new("London", hms(7, 0), hms(10, 0)),
            SessionWindow::new("New York AM", hms(13, 30), hms(16, 0)),
            SessionWindow::new("New York PM", hms(19, 0), hms(21, 0)),
        ]
    }
}

fn hms(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).expect("valid session time")
}

/// Classifies timestamps as inside or outside the configured sessions.
#[derive(Debug, Clone)]
pub struct SessionFilter {
    windows: Vec<SessionWindow>,
}

impl SessionFilter {
    pub fn new(windows: Vec<SessionWindow>) -> Self {
        Self { windows }
    }

    /// True iff the timestamp's local time-of-day falls inside any window.
    ///
    /// No timezone conversion happens: a timestamp carrying an offset
    /// contributes the wall-clock time it was written with. A timestamp
    /// that fails to parse is a hard error, never a silent skip.
    pub fn is_in_session(&self, raw: &str) -> Result<bool, ScanError> {
        let time = parse_timestamp(raw)?.time();
        Ok(self.windows.iter().any(|w| w.contains(time)))
    }
}

/// Parses the timestamp text found in candle series files.
///
/// Accepts date-times with a space or `T` separator, optional fractional
/// seconds and optional UTC offset, plus bare dates (daily and coarser
/// series), which parse as midnight.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ScanError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(ScanError::MalformedTimestamp {
        raw: raw.to_string(),
        reason: "unrecognized date-time format".to_string(),
    })
}
