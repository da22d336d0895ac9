use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity of a log record.
///
/// Variants are declared in ascending severity so the derived `Ord` gives
/// `Debug < Verbose < Info < Warn < Error`. A sink configured with a minimum
/// level accepts every record whose level compares greater than or equal to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Fine-grained tracing of internal state
    Debug,
    /// Chatty progress output, one step below informational
    Verbose,
    /// Normal operational messages
    Info,
    /// Potentially harmful situations
    Warn,
    /// Failures the caller should know about
    Error,
}

impl LogLevel {
    /// All levels in ascending severity order
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Verbose,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Lowercase level name
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Uppercased name as it appears in a formatted line
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "verbose" => Ok(LogLevel::Verbose),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// `tracing` has no `verbose`; its DEBUG sits one step below INFO, so it
/// takes that slot and TRACE becomes the facade's `debug`.
impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => LogLevel::Debug,
            tracing::Level::DEBUG => LogLevel::Verbose,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        for (i, low) in LogLevel::ALL.iter().enumerate() {
            for high in &LogLevel::ALL[i + 1..] {
                assert!(low < high, "{} should be below {}", low, high);
            }
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(LogLevel::Verbose.label(), "VERBOSE");
        assert_eq!(LogLevel::Warn.label(), "WARN");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" Verbose ".parse::<LogLevel>().unwrap(), LogLevel::Verbose);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("err".parse::<LogLevel>().unwrap(), LogLevel::Error);

        assert!("".parse::<LogLevel>().is_err());
        assert!("fatal".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_from_tracing_level() {
        assert_eq!(LogLevel::from(tracing::Level::TRACE), LogLevel::Debug);
        assert_eq!(LogLevel::from(tracing::Level::DEBUG), LogLevel::Verbose);
        assert_eq!(LogLevel::from(tracing::Level::INFO), LogLevel::Info);
        assert_eq!(LogLevel::from(tracing::Level::WARN), LogLevel::Warn);
        assert_eq!(LogLevel::from(tracing::Level::ERROR), LogLevel::Error);
    }
}
