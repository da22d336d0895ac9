use crate::defaults;
use crate::level::LogLevel;
use chrono::{Local, NaiveDateTime};

/// A single log call, stamped once at creation.
///
/// Every sink that receives the record prints the same timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    level: LogLevel,
    message: String,
    timestamp: String,
}

impl LogRecord {
    /// Create a record stamped with the current local time
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self::at(level, message, Local::now().naive_local())
    }

    /// Create a record for a fixed local time
    pub fn at(level: LogLevel, message: impl Into<String>, time: NaiveDateTime) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: time.format(defaults::TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_fixed_timestamp() {
        let time = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let record = LogRecord::at(LogLevel::Error, "disk full", time);

        assert_eq!(record.timestamp(), "2024-01-02 03:04:05");
        assert_eq!(record.level(), LogLevel::Error);
        assert_eq!(record.message(), "disk full");
    }

    #[test]
    fn test_hour_uses_twelve_hour_clock() {
        let time = NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_opt(15, 4, 5)
            .unwrap();
        assert_eq!(
            LogRecord::at(LogLevel::Info, "", time).timestamp(),
            "2024-06-30 03:04:05"
        );

        let midnight = NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            LogRecord::at(LogLevel::Info, "", midnight).timestamp(),
            "2024-06-30 12:00:00"
        );
    }

    #[test]
    fn test_now_has_expected_shape() {
        let record = LogRecord::new(LogLevel::Debug, String::from("now"));
        let ts = record.timestamp();

        assert_eq!(ts.len(), "YYYY-MM-DD hh:mm:ss".len());
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }
}
