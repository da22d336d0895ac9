//! # tiered-log
//!
//! A leveled logging facade that routes records to console and file sinks
//! according to a deployment mode read once from the environment.
//!
//! ## Modes
//!
//! The mode comes from the `APP_ENV` variable (configurable), trimmed and
//! case-insensitive:
//!
//! - **production**: `error.log` and `warn.log`, nothing on the console
//! - **testing**: `error.log`, `verbose.log` and a verbose console
//! - **debug**: `error.log`, `debug.log` and a debug console
//! - anything else, or unset: `error.log` and a verbose console
//!
//! `error.log` is present in every mode.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use tiered_log::{Logger, LoggerSettings};
//!
//! fn main() -> anyhow::Result<()> {
//!     let logger = Logger::init(&LoggerSettings::default())?;
//!
//!     logger.verbose("connecting to database");
//!     logger.warn("retrying with backoff");
//!     logger.error("disk full");
//!     Ok(())
//! }
//! ```
//!
//! Lines look like `[2024-01-02 03:04:05] ERROR - disk full`; on a color
//! terminal the console paints WARN yellow and ERROR red.

/// `tracing` layer forwarding events into a [`Logger`]
pub mod bridge;

/// Command-line arguments of the `tiered-log` binary
pub mod cli;

pub mod error;

/// File and console line formatting
pub mod format;

/// Severity levels
pub mod level;

/// The logger facade: initialization and the logging operations
pub mod logger;

/// Deployment modes and the pure mode-to-sinks mapping
pub mod mode;

pub mod record;

/// Console and file sinks
pub mod sink;

pub use error::{InitError, SinkWriteError};
pub use level::LogLevel;
pub use logger::{Logger, LoggerSettings};
pub use mode::{Mode, SinkPlan};
pub use record::LogRecord;
pub use sink::Sink;

/// The current version of tiered-log
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Log directory, relative to the working directory
    pub const LOG_DIR: &str = "logs";

    /// Environment variable holding the deployment mode
    pub const MODE_VAR: &str = "APP_ENV";

    pub const ERROR_LOG: &str = "error.log";
    pub const WARN_LOG: &str = "warn.log";
    pub const VERBOSE_LOG: &str = "verbose.log";

    /// Removed at every startup so each debug session starts from an empty file
    pub const DEBUG_LOG: &str = "debug.log";

    /// `chrono` format of record timestamps: `YYYY-MM-DD hh:mm:ss`, local
    /// time, hour on the 12-hour clock
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M:%S";
}
