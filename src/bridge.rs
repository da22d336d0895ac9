//! Forward `tracing` events into a [`Logger`].
//!
//! Installing [`SinkLayer`] lets libraries that only speak `tracing` write
//! through the facade's sinks:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tiered_log::{bridge::SinkLayer, Logger, LoggerSettings};
//! use tracing_subscriber::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let logger = Arc::new(Logger::init(&LoggerSettings::default())?);
//! tracing_subscriber::registry()
//!     .with(SinkLayer::new(logger.clone()))
//!     .init();
//!
//! tracing::warn!(disk = "sda1", "low space");
//! # Ok(())
//! # }
//! ```
//!
//! Levels map as TRACE→debug, DEBUG→verbose, INFO→info, WARN→warn and
//! ERROR→error. Events emitted by this crate itself are skipped so a failing
//! sink cannot feed its own diagnostics back into the logger.

use crate::level::LogLevel;
use crate::logger::Logger;
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

const INTERNAL_TARGET: &str = "tiered_log";

/// A `tracing_subscriber` layer writing every event to a shared [`Logger`]
#[derive(Debug, Clone)]
pub struct SinkLayer {
    logger: Arc<Logger>,
}

impl SinkLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for SinkLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = LogLevel::from(*metadata.level());
        if !self.logger.enabled(level) || is_internal(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.logger.log(level, &visitor.finish());
    }
}

fn is_internal(target: &str) -> bool {
    target == INTERNAL_TARGET || target.starts_with("tiered_log::")
}

/// Collects the `message` field and renders the rest as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ColorChoice;
    use crate::logger::LoggerSettings;
    use crate::sink::ConsoleTarget;
    use parking_lot::Mutex;
    use std::io::{self, Write};
    use tempfile::TempDir;
    use tracing_subscriber::prelude::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logger(dir: &TempDir, mode: &str, buf: SharedBuf) -> Arc<Logger> {
        let settings = LoggerSettings {
            log_dir: dir.path().join("logs"),
            mode: Some(mode.to_string()),
            color: ColorChoice::Never,
            ..Default::default()
        };
        Arc::new(Logger::init_with_console(&settings, ConsoleTarget::writer(buf)).unwrap())
    }

    fn console_lines(buf: &SharedBuf) -> Vec<String> {
        String::from_utf8(buf.0.lock().clone())
            .unwrap()
            .lines()
            .map(|line| line.split_once("] ").unwrap().1.to_string())
            .collect()
    }

    #[test]
    fn test_events_reach_sinks() {
        let dir = TempDir::new().unwrap();
        let buf = SharedBuf::default();
        let subscriber =
            tracing_subscriber::registry().with(SinkLayer::new(logger(&dir, "debug", buf.clone())));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!(target: "app", "cache miss");
            tracing::debug!(target: "app", "step one");
            tracing::warn!(target: "app", disk = "sda1", free = 3, "low space");
            tracing::error!(target: "app", code = 7);
        });

        assert_eq!(
            console_lines(&buf),
            vec![
                "DEBUG - cache miss",
                "VERBOSE - step one",
                "WARN - low space disk=sda1 free=3",
                "ERROR - code=7",
            ]
        );
    }

    #[test]
    fn test_threshold_applies_to_events() {
        let dir = TempDir::new().unwrap();
        let buf = SharedBuf::default();
        let subscriber = tracing_subscriber::registry()
            .with(SinkLayer::new(logger(&dir, "unspecified", buf.clone())));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!(target: "app", "dropped");
            tracing::info!(target: "app", "kept");
        });

        assert_eq!(console_lines(&buf), vec!["INFO - kept"]);
    }

    #[test]
    fn test_internal_events_skipped() {
        assert!(is_internal("tiered_log"));
        assert!(is_internal("tiered_log::logger"));
        assert!(!is_internal("tiered_logger"));
        assert!(!is_internal("app"));
    }
}
