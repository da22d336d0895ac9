//! # Logger Facade
//!
//! [`Logger`] is built once at process start and handed to call sites by
//! reference (or behind an `Arc` when shared with the [`crate::bridge`]
//! layer). Construction performs the only filesystem side effects of the
//! facade:
//!
//! 1. create the log directory if it does not exist
//! 2. delete a stale `debug.log` left by an earlier run
//! 3. open every planned file sink in append mode
//!
//! After that the sink list never changes. Each logging call builds one
//! [`LogRecord`] and hands it to every sink whose threshold admits it, in
//! plan order. Write failures are reported through `tracing` and never reach
//! the caller.

use crate::defaults;
use crate::error::InitError;
use crate::format::ColorChoice;
use crate::level::LogLevel;
use crate::mode::{Mode, ResolvedMode, SinkPlan, SinkTarget};
use crate::record::LogRecord;
use crate::sink::{ConsoleSink, ConsoleTarget, FileSink, RotationPolicy, Sink};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Settings used to build a [`Logger`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggerSettings {
    /// Directory holding the log files
    pub log_dir: PathBuf,
    /// Environment variable the mode is read from
    pub mode_var: String,
    /// Mode value that takes precedence over the environment
    pub mode: Option<String>,
    /// Console color handling
    pub color: ColorChoice,
    /// File rotation policy
    pub rotation: RotationPolicy,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(defaults::LOG_DIR),
            mode_var: defaults::MODE_VAR.to_string(),
            mode: None,
            color: ColorChoice::Auto,
            rotation: RotationPolicy::Never,
        }
    }
}

impl LoggerSettings {
    /// Resolve the mode from the override or the environment
    pub fn resolve_mode(&self) -> ResolvedMode {
        ResolvedMode::from_env(self.mode.as_deref(), &self.mode_var)
    }
}

/// The process-wide logger: a fixed mode and its ordered sinks
#[derive(Debug)]
pub struct Logger {
    resolved: ResolvedMode,
    plan: SinkPlan,
    sinks: Vec<Sink>,
    floor: LogLevel,
    log_dir: PathBuf,
    advisory: Option<String>,
}

impl Logger {
    /// Build a logger writing its console output to stdout.
    ///
    /// Prints the startup advisory (missing mode, production mode) to stderr
    /// once the log directory is prepared.
    pub fn init(settings: &LoggerSettings) -> Result<Self, InitError> {
        Self::init_with_console(settings, ConsoleTarget::stdout())
    }

    /// Build a logger whose console sink, if the mode has one, writes to
    /// `console`.
    pub fn init_with_console(
        settings: &LoggerSettings,
        console: ConsoleTarget,
    ) -> Result<Self, InitError> {
        // Mode is fixed from here on: override first, then the environment
        let resolved = settings.resolve_mode();

        // Prepare the directory and clear the previous debug session's file.
        // Either step failing is fatal and reported without the advisory.
        let log_dir = settings.log_dir.clone();
        ensure_log_dir(&log_dir)?;
        remove_stale(&log_dir.join(defaults::DEBUG_LOG))?;

        let advisory = resolved.advisory(&settings.mode_var);
        if let Some(ref message) = advisory {
            eprintln!("{}", message);
        }

        // Build every sink the mode calls for, in plan order
        let plan = resolved.mode.sink_plan();
        let sinks = open_sinks(&plan, settings, console)?;

        // Lowest threshold across sinks, used to skip records nobody accepts
        let floor = plan.floor();

        debug!(
            "Logger ready in {} mode with {} sinks under {:?}",
            resolved.mode,
            sinks.len(),
            log_dir
        );

        Ok(Self {
            resolved,
            plan,
            sinks,
            floor,
            log_dir,
            advisory,
        })
    }

    pub fn mode(&self) -> Mode {
        self.resolved.mode
    }

    /// Whether a mode value was supplied
    pub fn mode_present(&self) -> bool {
        self.resolved.present
    }

    /// The plan the sinks were built from
    pub fn plan(&self) -> &SinkPlan {
        &self.plan
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// The startup warning printed during init, if any
    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    /// Whether at least one sink accepts `level`
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.floor
    }

    /// Log `message` at `level` to every accepting sink
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }

        let record = LogRecord::new(level, message);
        self.dispatch(&record);
    }

    /// Hand an existing record to every accepting sink
    pub fn dispatch(&self, record: &LogRecord) {
        for sink in self.sinks.iter().filter(|s| s.accepts(record.level())) {
            if let Err(e) = sink.emit(record) {
                warn!("Dropped {} record: {}", record.level(), e);
            }
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn verbose(&self, message: &str) {
        self.log(LogLevel::Verbose, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Emit one record per level in ascending severity, for checking a
    /// deployment's sinks by eye.
    pub fn self_test(&self) {
        self.debug("Debug test");
        self.verbose("Verbose test");
        self.info("Info test");
        self.warn("Warning test");
        self.error("Error test");
    }
}

fn ensure_log_dir(dir: &Path) -> Result<(), InitError> {
    match fs::create_dir(dir) {
        Ok(()) => {
            debug!("Created log directory {:?}", dir);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(InitError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

fn remove_stale(path: &Path) -> Result<(), InitError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed stale log file {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(InitError::RemoveStale {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn open_sinks(
    plan: &SinkPlan,
    settings: &LoggerSettings,
    console: ConsoleTarget,
) -> Result<Vec<Sink>, InitError> {
    let mut console = Some(console);
    let mut sinks = Vec::with_capacity(plan.sinks.len());

    for spec in &plan.sinks {
        match spec.target {
            // Opening creates the file, so a fresh run shows every planned log
            SinkTarget::File { file_name } => {
                sinks.push(Sink::File(FileSink::open(
                    spec.min_level,
                    &settings.log_dir,
                    file_name,
                    settings.rotation,
                )?));
            }
            SinkTarget::Console => {
                // Plans hold at most one console sink
                if let Some(target) = console.take() {
                    sinks.push(Sink::Console(ConsoleSink::new(
                        spec.min_level,
                        target,
                        settings.color,
                    )));
                }
            }
        }
    }

    Ok(sinks)
}
