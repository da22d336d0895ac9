//! # Deployment Mode and Sink Planning
//!
//! The mode is read once at startup and decides which sinks exist for the
//! rest of the process. Everything in this module is pure: resolving the raw
//! environment value and mapping a [`Mode`] to its [`SinkPlan`] never touch
//! the filesystem, so the full mode table can be checked in unit tests.
//!
//! | mode        | sinks                                                   |
//! |-------------|---------------------------------------------------------|
//! | production  | `error.log` ≥ error, `warn.log` ≥ warn                  |
//! | testing     | `error.log` ≥ error, `verbose.log` ≥ verbose, console ≥ verbose |
//! | debug       | `error.log` ≥ error, `debug.log` ≥ debug, console ≥ debug |
//! | unspecified | `error.log` ≥ error, console ≥ verbose                  |

use crate::defaults;
use crate::level::LogLevel;
use serde::Serialize;
use std::fmt;

/// Deployment context controlling which sinks are active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Public deployment: warnings and errors go to files only
    Production,
    /// On a server but not deployed, usually driven over SSH
    Testing,
    /// Local or remote debugging with everything recorded
    Debug,
    /// Mode missing or unrecognised; quick local runs
    Unspecified,
}

impl Mode {
    /// Interpret a raw mode value. Matching is case-insensitive and ignores
    /// surrounding whitespace; anything unrecognised is `Unspecified`.
    pub fn parse(raw: &str) -> Mode {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" => Mode::Production,
            "testing" => Mode::Testing,
            "debug" => Mode::Debug,
            _ => Mode::Unspecified,
        }
    }

    /// The sinks this mode runs with, in write order.
    ///
    /// The error file is always the first entry.
    pub fn sink_plan(&self) -> SinkPlan {
        let mut sinks = vec![SinkSpec::file(defaults::ERROR_LOG, LogLevel::Error)];

        match self {
            Mode::Production => {
                sinks.push(SinkSpec::file(defaults::WARN_LOG, LogLevel::Warn));
            }
            Mode::Testing => {
                sinks.push(SinkSpec::file(defaults::VERBOSE_LOG, LogLevel::Verbose));
                sinks.push(SinkSpec::console(LogLevel::Verbose));
            }
            Mode::Debug => {
                sinks.push(SinkSpec::file(defaults::DEBUG_LOG, LogLevel::Debug));
                sinks.push(SinkSpec::console(LogLevel::Debug));
            }
            Mode::Unspecified => {
                sinks.push(SinkSpec::console(LogLevel::Verbose));
            }
        }

        SinkPlan { mode: *self, sinks }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Production => write!(f, "production"),
            Mode::Testing => write!(f, "testing"),
            Mode::Debug => write!(f, "debug"),
            Mode::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// A mode together with whether a value was supplied at all.
///
/// Both an absent variable and an unknown value end up as
/// [`Mode::Unspecified`], but only the absent case warrants an advisory at
/// startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedMode {
    pub mode: Mode,
    pub present: bool,
}

impl ResolvedMode {
    /// Resolve from a raw value. An empty string counts as absent.
    pub fn from_value(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if !value.is_empty() => Self {
                mode: Mode::parse(value),
                present: true,
            },
            _ => Self {
                mode: Mode::Unspecified,
                present: false,
            },
        }
    }

    /// Resolve from an explicit override, falling back to the named
    /// environment variable. An override always counts as present, even
    /// when empty, since the caller did choose a mode.
    pub fn from_env(mode_override: Option<&str>, var: &str) -> Self {
        match mode_override {
            Some(value) => Self {
                mode: Mode::parse(value),
                present: true,
            },
            None => Self::from_value(std::env::var(var).ok().as_deref()),
        }
    }

    /// One-line startup warning for this resolution, if any
    pub fn advisory(&self, var: &str) -> Option<String> {
        if !self.present {
            Some(format!("No {} found, only logging to console.", var))
        } else if self.mode == Mode::Production {
            Some("Starting in production mode".to_string())
        } else {
            None
        }
    }
}

/// Where a planned sink writes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum SinkTarget {
    Console,
    File { file_name: &'static str },
}

/// A sink description: its destination and minimum accepted level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SinkSpec {
    pub target: SinkTarget,
    pub min_level: LogLevel,
}

impl SinkSpec {
    pub fn console(min_level: LogLevel) -> Self {
        Self {
            target: SinkTarget::Console,
            min_level,
        }
    }

    pub fn file(file_name: &'static str, min_level: LogLevel) -> Self {
        Self {
            target: SinkTarget::File { file_name },
            min_level,
        }
    }

    pub fn accepts(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

/// The complete sink configuration for a mode
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SinkPlan {
    pub mode: Mode,
    pub sinks: Vec<SinkSpec>,
}

impl SinkPlan {
    /// Lowest level any planned sink accepts
    pub fn floor(&self) -> LogLevel {
        self.sinks
            .iter()
            .map(|spec| spec.min_level)
            .min()
            .unwrap_or(LogLevel::Error)
    }

    /// File names this plan writes to, in plan order
    pub fn file_names(&self) -> Vec<&'static str> {
        self.sinks
            .iter()
            .filter_map(|spec| match spec.target {
                SinkTarget::File { file_name } => Some(file_name),
                SinkTarget::Console => None,
            })
            .collect()
    }

    pub fn has_console(&self) -> bool {
        self.sinks
            .iter()
            .any(|spec| spec.target == SinkTarget::Console)
    }
}
