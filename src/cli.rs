//! Command-line interface definitions for modman.
//!
//! Field-level documentation lives in the clap attributes.

#![allow(clippy::missing_docs_in_private_items)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Main CLI structure for modman.
#[derive(Parser)]
#[command(
    name = "modman",
    version = crate::VERSION,
    about = "Module registry and migration drift tracker",
    long_about = "Inspects vendored and published modules: versions, dependencies, \
                  migration drift since the last check, and local customisations"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show installation status of modules
    Status {
        /// Module to inspect (all configured modules if omitted)
        module: Option<String>,
    },

    /// Compare a published module against the vendored copy
    Diff {
        /// Module to compare
        module: String,

        /// Show a line preview for each modified file
        #[arg(short, long)]
        detailed: bool,

        /// Show a full unified diff for each modified file
        #[arg(short, long, conflicts_with = "detailed")]
        unified: bool,
    },

    /// Record the current migration set of modules
    Track {
        /// Module to track (all configured modules if omitted)
        module: Option<String>,

        /// Track every module with a known version
        #[arg(short, long)]
        force: bool,
    },

    /// Report migrations added or removed since the last track
    DetectUpdates {
        /// Module to check (all configured modules if omitted)
        module: Option<String>,
    },

    /// List migrations that have not been applied yet
    CheckMigrations {
        /// Module to check (all configured modules if omitted)
        module: Option<String>,
    },

    /// Check that module dependencies are installed
    Dependencies {
        /// Module to check (all configured modules if omitted)
        module: Option<String>,
    },

    /// List module versions
    Versions {
        /// Print the changelog of this module instead
        #[arg(long, value_name = "MODULE")]
        changelog: Option<String>,
    },

    /// Mark a module as enabled in the status file
    Enable {
        /// Module to enable
        module: String,
    },

    /// Mark a module as disabled in the status file
    Disable {
        /// Module to disable
        module: String,
    },

    /// Get and set modman options
    Config {
        /// Configuration key
        key: Option<String>,

        /// Configuration value to set
        value: Option<String>,

        /// Unset the configuration key
        #[arg(long)]
        unset: bool,

        /// List all configuration values
        #[arg(short, long)]
        list: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
