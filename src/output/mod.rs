//! User-facing output and diagnostic logging setup.
//!
//! Command results go to stdout; status messages go to stderr so they never
//! mix with output that scripts may parse. Verbosity is process-wide:
//! - quiet: warnings and errors only
//! - normal: adds success and info messages
//! - verbose: adds detail lines and lowers the log filter to `debug`

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "MODMAN_LOG";

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Suppress informational messages, show only warnings and errors.
    Quiet = 0,
    /// Default verbosity level, show all standard messages.
    Normal = 1,
    /// Show verbose detail messages in addition to standard output.
    Verbose = 2,
}

impl Verbosity {
    /// Picks the level from the global CLI flags; `--quiet` wins.
    #[must_use]
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    const fn default_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "modman=debug",
        }
    }
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Installs the stderr log subscriber. `MODMAN_LOG` overrides the level
/// derived from `verbosity`. Calling it twice is harmless.
pub fn init_logging(verbosity: Verbosity) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.default_filter()));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(std::env::var_os("NO_COLOR").is_none()),
        )
        .with(filter)
        .try_init();
}

/// Prints a success message in green (respects quiet mode).
pub fn success(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Prints a warning message in bold yellow (always shown).
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow().bold());
}

/// Prints a detail message (only in verbose mode).
pub fn verbose(message: &str) {
    if get_verbosity() != Verbosity::Verbose {
        return;
    }
    eprintln!("{}", message.dimmed());
}
