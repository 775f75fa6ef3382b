//! Logging setup and user-facing output for the CLI

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress all output
    Quiet,
    /// Normal output level
    Normal,
    /// Verbose output with additional details
    Verbose,
}

impl LogLevel {
    /// Level selected by `--quiet` / `--verbose`; quiet wins
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Filter directive used when `RUST_LOG` does not apply
    pub fn default_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "convnp_trainer=debug,warn",
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` is honoured at the normal level; `--verbose` and `--quiet`
/// override it. Installing twice is a no-op.
pub fn init_tracing(level: LogLevel) {
    let filter = match level {
        LogLevel::Normal => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.default_directive())),
        LogLevel::Quiet | LogLevel::Verbose => EnvFilter::new(level.default_directive()),
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

/// Log a message if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if enabled(level, required) {
        println!("{msg}");
    }
}

fn enabled(level: LogLevel, required: LogLevel) -> bool {
    level != LogLevel::Quiet && (level == required || required == LogLevel::Normal)
}
