#![allow(clippy::arithmetic_side_effects)] // Counters over file lists cannot overflow
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # modman - module registry and migration drift tracker
//!
//! A host application ships pluggable modules (Post, Category, Tag, Menu, ...)
//! as a vendored copy inside a package, and users may publish a copy into the
//! project to customise it. modman answers the questions that arise when the
//! package updates underneath them:
//!
//! - which version of each module is installed, and are its dependencies present?
//! - which migration files appeared or disappeared since the last check?
//! - which migrations have not run yet?
//! - how does a published copy differ from the vendored one?
//!
//! ## Architecture
//!
//! - [`modules`]: descriptors, versions, dependencies, naming, activation flags
//! - [`migrations`]: migration files on disk and the applied-migrations list
//! - [`tracking`]: the persistent snapshot ledger and drift reports
//! - [`diff`]: vendored vs. published tree comparison
//! - [`layout`]: every filesystem location, resolved from [`config`]
//! - [`commands`]: CLI command implementations (the only code that prints)
//!
//! ## Example
//!
//! ```no_run
//! use modman::ModmanContext;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = ModmanContext::new()?;
//! let tracker = ctx.tracker();
//!
//! let report = tracker.compare_with_tracked("Post")?;
//! println!("{} new migrations", report.total_new());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Command implementations behind the CLI.
pub mod commands;

/// Configuration parsing, validation, and management.
pub mod config;

/// Module tree comparison (file sets, previews, unified diffs).
pub mod diff;

/// Filesystem layout of a project.
pub mod layout;

/// Migration enumeration and applied-migration lookup.
pub mod migrations;

/// Module descriptors, versions, dependencies and activation.
pub mod modules;

/// Output formatting and verbosity control.
pub mod output;

/// Migration snapshot ledger and drift detection.
pub mod tracking;

/// Utility functions and helpers.
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Current version of the modman binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration file name looked up in the project root.
pub const DEFAULT_CONFIG_FILE: &str = "modman.toml";

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "MODMAN_CONFIG_PATH";

/// Environment variable overriding the project root.
pub const PROJECT_ROOT_ENV: &str = "MODMAN_PROJECT_ROOT";

/// Everything a command needs: where the project is, its configuration and
/// the resolved layout.
///
/// Components borrow the layout; nothing here is cached between calls, so
/// every query sees the filesystem as it is at call time.
#[derive(Debug, Clone)]
pub struct ModmanContext {
    /// Root of the host project.
    pub project_root: PathBuf,

    /// Path to the configuration file.
    pub config_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,

    /// Locations resolved from `config` against `project_root`.
    pub layout: layout::Layout,
}

impl ModmanContext {
    /// Builds the context from the environment: `MODMAN_PROJECT_ROOT` (or the
    /// current directory) and `MODMAN_CONFIG_PATH` (or `modman.toml` in the
    /// project root).
    ///
    /// # Errors
    /// Returns an error if the current directory cannot be determined or the
    /// configuration cannot be loaded.
    pub fn new() -> Result<Self> {
        let project_root = match std::env::var_os(PROJECT_ROOT_ENV) {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir().context("Could not determine current directory")?,
        };

        let config_path = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| project_root.join(DEFAULT_CONFIG_FILE), PathBuf::from);

        let context = Self::new_explicit(project_root, config_path)?;

        let validator = config::validator::ConfigValidator::new();
        if let Err(e) = validator.validate_config_file(&context.config_path) {
            output::warning(&format!("Configuration validation failed: {e}"));
        }

        Ok(context)
    }

    /// Builds the context from explicit paths, writing a default
    /// configuration if none exists yet.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be loaded or created, or
    /// a configured path cannot be resolved.
    pub fn new_explicit(project_root: PathBuf, config_path: PathBuf) -> Result<Self> {
        let config = config::Config::load(&config_path)?;
        let layout = layout::Layout::from_config(&project_root, &config)?;

        Ok(Self {
            project_root,
            config_path,
            config,
            layout,
        })
    }

    /// Re-resolves the layout after the configuration changed.
    ///
    /// # Errors
    /// Returns an error if a configured path cannot be resolved.
    pub fn reload_layout(&mut self) -> Result<()> {
        self.layout = layout::Layout::from_config(&self.project_root, &self.config)?;
        Ok(())
    }

    /// Descriptor access for this project.
    #[must_use]
    pub const fn registry(&self) -> modules::ModuleRegistry<'_> {
        modules::ModuleRegistry::new(&self.layout)
    }

    /// Migration file discovery for this project.
    #[must_use]
    pub const fn enumerator(&self) -> migrations::MigrationEnumerator<'_> {
        migrations::MigrationEnumerator::new(&self.layout)
    }

    /// Drift tracker over this project's ledger.
    #[must_use]
    pub fn tracker(&self) -> tracking::DriftTracker<'_> {
        tracking::DriftTracker::new(&self.layout, &self.config.migrations.extension)
    }

    /// The applied-migrations list configured for this project.
    #[must_use]
    pub fn applied_migrations(&self) -> migrations::FileAppliedMigrations {
        migrations::FileAppliedMigrations::new(&self.layout.applied_migrations)
    }

    /// Loads the module activation file, creating it with every configured
    /// module enabled when absent.
    ///
    /// # Errors
    /// Returns an error if the status file is malformed or cannot be created.
    pub fn statuses(&self) -> Result<modules::ModuleStatuses> {
        modules::ModuleStatuses::load_or_create(
            &self.layout.status_file,
            &self.config.modules.names,
        )
    }

    /// Tree comparison options from the `[diff]` section.
    #[must_use]
    pub fn diff_options(&self) -> diff::DiffOptions {
        diff::DiffOptions::from_config(&self.config.diff)
    }

    /// The module a command should act on, or the configured module list
    /// when none was given.
    #[must_use]
    pub fn target_modules(&self, module: Option<&str>) -> Vec<String> {
        module.map_or_else(
            || self.config.modules.names.clone(),
            |name| vec![self.resolve_module_name(name)],
        )
    }

    /// Maps user input to a module directory name: the input as typed, its
    /// studly form, then the canonical singular form, whichever exists on
    /// disk first. Falls back to the canonical form.
    #[must_use]
    pub fn resolve_module_name(&self, input: &str) -> String {
        let canonical = modules::naming::module_name(input);
        [input.to_string(), modules::naming::studly(input)]
            .into_iter()
            .chain(std::iter::once(canonical.clone()))
            .find(|candidate| {
                !candidate.is_empty() && self.layout.locate(candidate).source().is_some()
            })
            .unwrap_or(canonical)
    }

    /// Path of `path` relative to the project root for display.
    #[must_use]
    pub fn display_path(&self, path: &Path) -> String {
        utils::paths::to_slash_relative(path, &self.project_root)
            .unwrap_or_else(|| path.display().to_string())
    }
}
