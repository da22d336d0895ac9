use std::error::Error as _;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures while preparing the log directory and its files.
///
/// "Already exists" and "not found" during setup are expected and never
/// surface as an `InitError`.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to remove stale log file {}: {source}", path.display())]
    RemoveStale { path: PathBuf, source: io::Error },

    #[error("failed to open log file {}: {source}", path.display())]
    OpenSink {
        path: PathBuf,
        source: tracing_appender::rolling::InitError,
    },
}

impl InitError {
    /// Process exit code for this failure: the originating OS error code, or
    /// 1 when the failure carries none.
    pub fn exit_code(&self) -> i32 {
        let io_error = match self {
            InitError::CreateDir { source, .. } | InitError::RemoveStale { source, .. } => {
                Some(source)
            }
            InitError::OpenSink { source, .. } => {
                source.source().and_then(|e| e.downcast_ref::<io::Error>())
            }
        };

        io_error.and_then(io::Error::raw_os_error).unwrap_or(1)
    }
}

/// A sink failed to write a line. Never returned to logging callers.
#[derive(Debug, Error)]
#[error("failed to write to {target}: {source}")]
pub struct SinkWriteError {
    pub target: String,
    #[source]
    pub source: io::Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_uses_os_error() {
        let err = InitError::CreateDir {
            path: PathBuf::from("logs"),
            source: io::Error::from_raw_os_error(13),
        };
        assert_eq!(err.exit_code(), 13);
    }

    #[test]
    fn test_exit_code_fallback() {
        let err = InitError::RemoveStale {
            path: PathBuf::from("logs/debug.log"),
            source: io::Error::new(io::ErrorKind::Other, "synthetic"),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("logs/debug.log"));
    }

    #[test]
    fn test_sink_write_error_display() {
        let err = SinkWriteError {
            target: "console".to_string(),
            source: io::Error::new(io::ErrorKind::BrokenPipe, "closed"),
        };
        assert_eq!(err.to_string(), "failed to write to console: closed");
    }
}
