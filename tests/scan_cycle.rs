//! End-to-end scan cycles against a fixture CSV tree on disk: real CSV
//! loading, a real alert log and a recording notifier.

use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use ictscan::application::pipeline::ScanPipeline;
use ictscan::config::ScanConfig;
use ictscan::domain::ports::AlertNotifier;
use ictscan::infrastructure::data::CsvMarketData;
use ictscan::infrastructure::persistence::CsvAlertLog;

#[derive(Default)]
struct RecordingNotifier {
    sent: RefCell<Vec<String>>,
}

impl AlertNotifier for RecordingNotifier {
    fn send(&self, message: &str) -> Result<()> {
        self.sent.borrow_mut().push(message.to_string());
        Ok(())
    }
}

struct FailingNotifier;

impl AlertNotifier for FailingNotifier {
    fn send(&self, _message: &str) -> Result<()> {
        Err(anyhow!("chat endpoint unreachable"))
    }
}

struct Fixture {
    root: PathBuf,
}

impl Fixture {
    /// Builds a data tree for NAS100 with the qualifying 1m series and
    /// quiet higher-timeframe series.
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("ictscan-e2e-{}-{}", name, std::process::id()));
        if root.exists() {
            fs::remove_dir_all(&root).unwrap();
        }
        fs::create_dir_all(root.join("data/NAS100")).unwrap();

        let fixture = Self { root };

        // Bar 5: low 100.5 gaps over bar 3's high 100.0, bearish body at
        // the window high, 08:05 inside the London window.
        fixture.write_series(
            "1m",
            "2024-01-02 08:00:00,99.0,99.5,98.5,99.0,1000\n\
             2024-01-02 08:01:00,99.0,99.6,98.8,99.2,1000\n\
             2024-01-02 08:02:00,99.2,99.8,99.0,99.5,1000\n\
             2024-01-02 08:03:00,99.5,100.0,99.3,99.9,1000\n\
             2024-01-02 08:04:00,100.8,101.0,100.6,100.9,1000\n\
             2024-01-02 08:05:00,101.2,101.5,100.5,100.9,1000\n",
        );

        let quiet = "2024-01-02,100.0,101.0,99.0,100.5,1000\n\
                     2024-01-03,100.0,101.0,99.0,100.5,1000\n\
                     2024-01-04,100.0,101.0,99.0,100.5,1000\n\
                     2024-01-05,100.0,101.0,99.0,100.5,1000\n\
                     2024-01-08,100.0,101.0,99.0,100.5,1000\n";
        for stem in ["5m", "60m", "240m", "1d", "1wk", "1mo"] {
            fixture.write_series(stem, quiet);
        }

        fixture
    }

    fn write_series(&self, stem: &str, body: &str) {
        fs::write(
            self.root.join("data/NAS100").join(format!("{stem}.csv")),
            format!("timestamp,open,high,low,close,volume\n{body}"),
        )
        .unwrap();
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    fn log_path(&self) -> PathBuf {
        self.root.join("alert_log.csv")
    }

    fn pipeline(&self) -> ScanPipeline<CsvMarketData> {
        ScanPipeline::new(ScanConfig::default(), CsvMarketData::new(self.data_dir()))
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn log_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn first_cycle_notifies_and_records_the_setup() {
    let fixture = Fixture::new("first-cycle");
    let pipeline = fixture.pipeline();
    let notifier = RecordingNotifier::default();
    let mut store = CsvAlertLog::open(fixture.log_path()).unwrap();

    let notified = pipeline.run_scan_cycle(&notifier, &mut store).unwrap();

    assert_eq!(notified.len(), 1);
    let setup = &notified[0];
    assert_eq!(setup.alert_id(), "NAS100_1m_2024-01-02 08:05:00_100.90");

    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("Asset: NAS100"));
    assert!(sent[0].contains("Entry: 100.90"));
    assert!(sent[0].contains("SL: 100.50"));
    assert!(sent[0].contains("TP: 101.70"));

    let lines = log_lines(&fixture.log_path());
    assert_eq!(lines.len(), 2); // header + one identifier
    assert_eq!(lines[1], "NAS100_1m_2024-01-02 08:05:00_100.90");
}

#[test]
fn second_cycle_with_unchanged_input_notifies_nothing() {
    let fixture = Fixture::new("idempotent");
    let pipeline = fixture.pipeline();
    let notifier = RecordingNotifier::default();

    let mut store = CsvAlertLog::open(fixture.log_path()).unwrap();
    let first = pipeline.run_scan_cycle(&notifier, &mut store).unwrap();
    assert_eq!(first.len(), 1);

    // Fresh store instance over the same file, as a restarted process
    // would see it
    let mut reopened = CsvAlertLog::open(fixture.log_path()).unwrap();
    let second = pipeline.run_scan_cycle(&notifier, &mut reopened).unwrap();

    assert!(second.is_empty());
    assert_eq!(notifier.sent.borrow().len(), 1);
    assert_eq!(log_lines(&fixture.log_path()).len(), 2);
}

#[test]
fn three_qualifying_bars_record_three_identifiers_in_scan_order() {
    let fixture = Fixture::new("three-bars");
    // Rising staircase of bearish bars: indices 3..5 all qualify
    let body: String = (0..6)
        .map(|i| {
            let x = 100.0 + i as f64;
            format!(
                "2024-01-02 08:0{i}:00,{:.1},{:.1},{:.1},{:.1},1000\n",
                x + 0.3,
                x + 0.5,
                x,
                x + 0.1
            )
        })
        .collect();
    fixture.write_series("1m", &body);

    let pipeline = fixture.pipeline();
    let notifier = RecordingNotifier::default();
    let mut store = CsvAlertLog::open(fixture.log_path()).unwrap();
    let notified = pipeline.run_scan_cycle(&notifier, &mut store).unwrap();

    assert_eq!(notified.len(), 3);
    let lines = log_lines(&fixture.log_path());
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "NAS100_1m_2024-01-02 08:03:00_103.10");
    assert_eq!(lines[2], "NAS100_1m_2024-01-02 08:04:00_104.10");
    assert_eq!(lines[3], "NAS100_1m_2024-01-02 08:05:00_105.10");
}

#[test]
fn failed_notification_is_retried_on_the_next_cycle() {
    let fixture = Fixture::new("retry");
    let pipeline = fixture.pipeline();

    let mut store = CsvAlertLog::open(fixture.log_path()).unwrap();
    let err = pipeline
        .run_scan_cycle(&FailingNotifier, &mut store)
        .unwrap_err();
    assert!(err.to_string().contains("alert notification failed"));

    // Identifier was not recorded, so the next cycle sends it
    assert_eq!(log_lines(&fixture.log_path()).len(), 1); // header only

    let notifier = RecordingNotifier::default();
    let notified = pipeline.run_scan_cycle(&notifier, &mut store).unwrap();
    assert_eq!(notified.len(), 1);
    assert_eq!(log_lines(&fixture.log_path()).len(), 2);
}

#[test]
fn missing_timeframe_file_suppresses_the_symbol() {
    let fixture = Fixture::new("missing-tf");
    fs::remove_file(fixture.root.join("data/NAS100/1wk.csv")).unwrap();

    let pipeline = fixture.pipeline();
    let notifier = RecordingNotifier::default();
    let mut store = CsvAlertLog::open(fixture.log_path()).unwrap();
    let notified = pipeline.run_scan_cycle(&notifier, &mut store).unwrap();

    assert!(notified.is_empty());
    assert!(notifier.sent.borrow().is_empty());
}
