//! Line formatting for file and console sinks.
//!
//! Both sinks share the `[<timestamp>] <LEVEL> - <message>` layout. The
//! console variant paints the level token (yellow WARN, red ERROR) when the
//! destination supports color.

use crate::level::LogLevel;
use crate::record::LogRecord;
use clap::ValueEnum;
use colored::Color;
use std::fmt;

/// Whether console output should carry ANSI color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when the destination is a terminal and the environment allows it
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl ColorChoice {
    /// Decide for a destination.
    ///
    /// `Auto` defers to `colored`'s environment handling (`NO_COLOR`,
    /// `CLICOLOR`, `CLICOLOR_FORCE`) on top of the terminal check. The answer
    /// applies to one sink only; `colored`'s process-wide override is left
    /// alone.
    pub fn resolve(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Never => false,
            ColorChoice::Always => true,
            ColorChoice::Auto => {
                is_terminal && colored::control::SHOULD_COLORIZE.should_colorize()
            }
        }
    }
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorChoice::Auto => write!(f, "auto"),
            ColorChoice::Always => write!(f, "always"),
            ColorChoice::Never => write!(f, "never"),
        }
    }
}

/// File line, without the trailing newline
pub fn format_file_line(record: &LogRecord) -> String {
    format!(
        "[{}] {} - {}",
        record.timestamp(),
        record.level().label(),
        record.message()
    )
}

/// Console line, without the trailing newline
pub fn format_console_line(record: &LogRecord, colorize: bool) -> String {
    if !colorize {
        return format_file_line(record);
    }

    format!(
        "[{}] {} - {}",
        record.timestamp(),
        paint_level(record.level()),
        record.message()
    )
}

// Escape codes are built here rather than through `Colorize`, whose output
// depends on the global `SHOULD_COLORIZE` state instead of this sink's choice
fn paint_level(level: LogLevel) -> String {
    let color = match level {
        LogLevel::Warn => Color::Yellow,
        LogLevel::Error => Color::Red,
        _ => return level.label().to_string(),
    };
    format!("\x1b[{}m{}\x1b[0m", color.to_fg_str(), level.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(level: LogLevel, message: &str) -> LogRecord {
        let time = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        LogRecord::at(level, message, time)
    }

    #[test]
    fn test_file_line() {
        assert_eq!(
            format_file_line(&record(LogLevel::Error, "disk full")),
            "[2024-01-02 03:04:05] ERROR - disk full"
        );
        assert_eq!(
            format_file_line(&record(LogLevel::Verbose, "step 2")),
            "[2024-01-02 03:04:05] VERBOSE - step 2"
        );
    }

    #[test]
    fn test_console_line_plain() {
        for level in LogLevel::ALL {
            let r = record(level, "same");
            assert_eq!(format_console_line(&r, false), format_file_line(&r));
        }
    }

    #[test]
    fn test_console_line_colored() {
        assert_eq!(
            format_console_line(&record(LogLevel::Warn, "low memory"), true),
            "[2024-01-02 03:04:05] \u{1b}[33mWARN\u{1b}[0m - low memory"
        );
        assert_eq!(
            format_console_line(&record(LogLevel::Error, "x"), true),
            "[2024-01-02 03:04:05] \u{1b}[31mERROR\u{1b}[0m - x"
        );
        // Only WARN and ERROR are painted
        assert_eq!(
            format_console_line(&record(LogLevel::Info, "ok"), true),
            "[2024-01-02 03:04:05] INFO - ok"
        );
    }

    #[test]
    fn test_color_choice_resolve() {
        assert!(!ColorChoice::Never.resolve(true));
        assert!(!ColorChoice::Auto.resolve(false));
        assert_eq!(ColorChoice::default(), ColorChoice::Auto);
    }

    #[test]
    fn test_always_leaves_global_color_state() {
        let before = colored::control::SHOULD_COLORIZE.should_colorize();
        assert!(ColorChoice::Always.resolve(false));
        assert_eq!(
            colored::control::SHOULD_COLORIZE.should_colorize(),
            before
        );
    }
}
