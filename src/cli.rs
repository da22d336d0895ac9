use crate::format::ColorChoice;
use crate::level::LogLevel;
use crate::logger::LoggerSettings;
use crate::sink::RotationPolicy;
use clap::Parser;
use std::path::PathBuf;

/// tiered-log - route log records to console and files by deployment mode
///
/// With no message, emits one record at every level as a self-test.
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Message to log instead of running the self-test
    pub message: Option<String>,

    /// Level for MESSAGE (debug, verbose, info, warn, error)
    #[clap(short = 'l', long, default_value_t = LogLevel::Info)]
    pub level: LogLevel,

    /// Mode to run in, overriding the environment (production, testing, debug)
    #[clap(short = 'm', long, help_heading = "Configuration")]
    pub mode: Option<String>,

    /// Environment variable the mode is read from
    #[clap(long, default_value = crate::defaults::MODE_VAR, help_heading = "Configuration")]
    pub mode_var: String,

    /// Directory for log files
    #[clap(long, default_value = crate::defaults::LOG_DIR, help_heading = "Configuration")]
    pub log_dir: PathBuf,

    /// Console color handling
    #[clap(long, value_enum, default_value_t = ColorChoice::Auto, help_heading = "Configuration")]
    pub color: ColorChoice,

    /// File rotation policy
    #[clap(long, value_enum, default_value_t = RotationPolicy::Never, help_heading = "Configuration")]
    pub rotation: RotationPolicy,

    /// Print the sink plan for the resolved mode as JSON and exit
    #[clap(long, default_value_t = false)]
    pub show_plan: bool,

    /// Show the logger's own diagnostics on stderr
    #[clap(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

impl From<&Args> for LoggerSettings {
    fn from(args: &Args) -> Self {
        Self {
            log_dir: args.log_dir.clone(),
            mode_var: args.mode_var.clone(),
            mode: args.mode.clone(),
            color: args.color,
            rotation: args.rotation,
        }
    }
}
