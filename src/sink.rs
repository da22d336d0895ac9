//! # Sinks
//!
//! A [`Sink`] is a destination with a minimum accepted level. There are two
//! variants:
//!
//! - **Console**: writes colorized lines to stdout, or to any writer handed
//!   in through [`ConsoleTarget::writer`]
//! - **File**: appends plain lines to a file under the log directory through
//!   a `tracing_appender` rolling appender
//!
//! Each formatted line, newline included, goes to the destination in a
//! single `write_all`, so concurrent appenders from other processes do not
//! interleave inside a line on platforms with atomic appends.

use crate::error::{InitError, SinkWriteError};
use crate::format::{format_console_line, format_file_line, ColorChoice};
use crate::level::LogLevel;
use crate::record::LogRecord;
use clap::ValueEnum;
use parking_lot::Mutex;
use std::fmt;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;

/// How often file sinks start a new file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum RotationPolicy {
    /// One file per sink, named exactly after the sink
    #[default]
    Never,
    /// New file every hour, suffixed with the date and hour
    Hourly,
    /// New file every day, suffixed with the date
    Daily,
}

impl RotationPolicy {
    fn rotation(self) -> Rotation {
        match self {
            RotationPolicy::Never => Rotation::NEVER,
            RotationPolicy::Hourly => Rotation::HOURLY,
            RotationPolicy::Daily => Rotation::DAILY,
        }
    }
}

impl fmt::Display for RotationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationPolicy::Never => write!(f, "never"),
            RotationPolicy::Hourly => write!(f, "hourly"),
            RotationPolicy::Daily => write!(f, "daily"),
        }
    }
}

/// Destination for the console sink
pub struct ConsoleTarget {
    writer: Box<dyn Write + Send>,
    is_terminal: bool,
}

impl ConsoleTarget {
    /// The process's standard output
    pub fn stdout() -> Self {
        let stdout = io::stdout();
        let is_terminal = stdout.is_terminal();
        Self {
            writer: Box::new(stdout),
            is_terminal,
        }
    }

    /// Any other writer. It is never treated as a terminal, so
    /// [`ColorChoice::Auto`] leaves its output plain.
    pub fn writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            is_terminal: false,
        }
    }
}

/// Console sink with optional colorized level tokens
pub struct ConsoleSink {
    min_level: LogLevel,
    colorize: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new(min_level: LogLevel, target: ConsoleTarget, color: ColorChoice) -> Self {
        Self {
            min_level,
            colorize: color.resolve(target.is_terminal),
            out: Mutex::new(target.writer),
        }
    }

    pub fn is_colorized(&self) -> bool {
        self.colorize
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        out.write_all(line.as_bytes())?;
        out.flush()
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("min_level", &self.min_level)
            .field("colorize", &self.colorize)
            .finish_non_exhaustive()
    }
}

/// Append-only file sink
///
/// With [`RotationPolicy::Never`] the sink checks before every write that
/// its path still names the file it holds open. When the file was deleted
/// or replaced, for example by a later [`crate::Logger`] clearing a stale
/// `debug.log`, the sink reopens the path and keeps appending there.
pub struct FileSink {
    min_level: LogLevel,
    dir: PathBuf,
    file_name: String,
    path: PathBuf,
    rotation: RotationPolicy,
    open: Mutex<OpenFile>,
}

struct OpenFile {
    appender: RollingFileAppender,
    identity: Option<FileIdentity>,
}

impl FileSink {
    /// Open (creating if needed) `file_name` under `dir` in append mode.
    pub fn open(
        min_level: LogLevel,
        dir: &Path,
        file_name: &str,
        rotation: RotationPolicy,
    ) -> Result<Self, InitError> {
        let path = dir.join(file_name);
        let appender =
            build_appender(dir, file_name, rotation).map_err(|source| InitError::OpenSink {
                path: path.clone(),
                source,
            })?;
        let identity = FileIdentity::of(&path);

        debug!("Opened {} sink at {:?}", min_level, path);
        Ok(Self {
            min_level,
            dir: dir.to_path_buf(),
            file_name: file_name.to_string(),
            path,
            rotation,
            open: Mutex::new(OpenFile { appender, identity }),
        })
    }

    /// Base path of the file. With hourly or daily rotation the appender
    /// writes to this path plus a date suffix.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut open = self.open.lock();

        // Rotated files carry a date suffix, so only unrotated paths can be checked
        if self.rotation == RotationPolicy::Never {
            let current = FileIdentity::of(&self.path);
            if current.is_none() || current != open.identity {
                warn!("Log file {:?} was removed or replaced, reopening", self.path);
                open.appender = build_appender(&self.dir, &self.file_name, self.rotation)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
                open.identity = FileIdentity::of(&self.path);
            }
        }

        let mut writer = open.appender.make_writer();
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}

fn build_appender(
    dir: &Path,
    file_name: &str,
    rotation: RotationPolicy,
) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(rotation.rotation())
        .filename_prefix(file_name)
        .build(dir)
}

/// Identifies the file a path currently names
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FileIdentity {
    dev: u64,
    ino: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    fn of(path: &Path) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        fs::metadata(path).ok().map(|m| Self {
            dev: m.dev(),
            ino: m.ino(),
        })
    }

    // No stable inode on other platforms; only detects deletion
    #[cfg(not(unix))]
    fn of(path: &Path) -> Option<Self> {
        fs::metadata(path).ok().map(|_| Self { dev: 0, ino: 0 })
    }
}

impl fmt::Debug for FileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSink")
            .field("min_level", &self.min_level)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// A log destination
#[derive(Debug)]
pub enum Sink {
    Console(ConsoleSink),
    File(FileSink),
}

impl Sink {
    pub fn min_level(&self) -> LogLevel {
        match self {
            Sink::Console(sink) => sink.min_level,
            Sink::File(sink) => sink.min_level,
        }
    }

    /// Whether a record at `level` should reach this sink
    pub fn accepts(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    /// Format a record the way this sink prints it, without the newline
    pub fn render(&self, record: &LogRecord) -> String {
        match self {
            Sink::Console(sink) => format_console_line(record, sink.colorize),
            Sink::File(_) => format_file_line(record),
        }
    }

    /// Write one already-formatted line. The newline is appended here.
    pub fn write(&self, line: &str) -> Result<(), SinkWriteError> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let result = match self {
            Sink::Console(sink) => sink.write_line(&buf),
            Sink::File(sink) => sink.write_line(&buf),
        };

        result.map_err(|source| SinkWriteError {
            target: self.describe(),
            source,
        })
    }

    /// Render and write `record`. Does not check [`Sink::accepts`].
    pub fn emit(&self, record: &LogRecord) -> Result<(), SinkWriteError> {
        self.write(&self.render(record))
    }

    /// Short human-readable name, used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            Sink::Console(_) => "console".to_string(),
            Sink::File(sink) => sink.path.display().to_string(),
        }
    }
}
