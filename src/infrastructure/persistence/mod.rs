mod alert_log;

pub use alert_log::CsvAlertLog;
