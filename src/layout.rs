//! Filesystem layout of a host project.
//!
//! Every module can exist in two places: the vendored copy shipped by the
//! package (`core.package_path`) and a user-published copy
//! (`core.published_path`) that the user owns and may have customised.
//! [`Layout`] resolves all configured locations once against the project root
//! so the rest of the crate never joins config paths by hand.

use crate::config::Config;
use crate::utils::paths::resolve_against;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name of the drift ledger inside the state directory.
pub const LEDGER_FILE: &str = "module_migrations_tracking.bin";

/// Default file name of the applied-migrations list inside the state directory.
pub const APPLIED_MIGRATIONS_FILE: &str = "applied_migrations";

/// Which copy of a module the host application runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleSource {
    /// Only the package copy exists; updates arrive with the package.
    Vendored,
    /// A published copy exists; the user owns it and the package copy is ignored.
    UserOwned,
}

impl ModuleSource {
    /// Short label used in status listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vendored => "vendor (package)",
            Self::UserOwned => "published (custom)",
        }
    }

    /// How the module receives updates.
    #[must_use]
    pub const fn update_strategy(self) -> &'static str {
        match self {
            Self::Vendored => "Updateable with the package",
            Self::UserOwned => "User owns this",
        }
    }
}

/// Where a module was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLocation {
    pub name: String,
    pub in_package: bool,
    pub published: bool,
}

impl ModuleLocation {
    /// The active copy, or `None` when the module exists in neither location.
    #[must_use]
    pub const fn source(&self) -> Option<ModuleSource> {
        if self.published {
            Some(ModuleSource::UserOwned)
        } else if self.in_package {
            Some(ModuleSource::Vendored)
        } else {
            None
        }
    }

    /// Whether the package copy can be compared against a published copy.
    #[must_use]
    pub const fn is_diffable(&self) -> bool {
        self.in_package && self.published
    }
}

/// Resolved absolute locations for one project.
#[derive(Debug, Clone)]
pub struct Layout {
    pub project_root: PathBuf,
    pub package_root: PathBuf,
    pub published_root: PathBuf,
    pub state_dir: PathBuf,
    pub status_file: PathBuf,
    pub applied_migrations: PathBuf,
    pub descriptor_file: String,
    pub migrations_dir: String,
}

impl Layout {
    /// Resolves every configured path against `project_root`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured `~/` path cannot be expanded.
    pub fn from_config(project_root: &Path, config: &Config) -> Result<Self> {
        let state_dir = resolve_against(project_root, &config.core.state_dir)?;
        let applied_migrations = match &config.core.applied_migrations {
            Some(path) => resolve_against(project_root, path)?,
            None => state_dir.join(APPLIED_MIGRATIONS_FILE),
        };

        Ok(Self {
            project_root: project_root.to_path_buf(),
            package_root: resolve_against(project_root, &config.core.package_path)?,
            published_root: resolve_against(project_root, &config.core.published_path)?,
            status_file: resolve_against(project_root, &config.core.status_file)?,
            state_dir,
            applied_migrations,
            descriptor_file: config.modules.descriptor_file.clone(),
            migrations_dir: config.modules.migrations_dir.clone(),
        })
    }

    /// Vendored copy of a module.
    #[must_use]
    pub fn package_module_dir(&self, name: &str) -> PathBuf {
        self.package_root.join(name)
    }

    /// User-published copy of a module.
    #[must_use]
    pub fn published_module_dir(&self, name: &str) -> PathBuf {
        self.published_root.join(name)
    }

    /// Migration directories to scan, vendored first.
    #[must_use]
    pub fn migration_dirs(&self, name: &str) -> [PathBuf; 2] {
        [
            self.package_module_dir(name).join(&self.migrations_dir),
            self.published_module_dir(name).join(&self.migrations_dir),
        ]
    }

    /// Descriptor candidates, vendored first.
    #[must_use]
    pub fn descriptor_paths(&self, name: &str) -> [PathBuf; 2] {
        [
            self.package_module_dir(name).join(&self.descriptor_file),
            self.published_module_dir(name).join(&self.descriptor_file),
        ]
    }

    #[must_use]
    pub fn ledger_path(&self) -> PathBuf {
        self.state_dir.join(LEDGER_FILE)
    }

    /// Module directory names shipped by the package.
    ///
    /// # Errors
    ///
    /// Returns an error if the package root exists but cannot be read.
    pub fn package_modules(&self) -> Result<Vec<String>> {
        list_module_dirs(&self.package_root)
    }

    /// Module directory names published into the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the published root exists but cannot be read.
    pub fn published_modules(&self) -> Result<Vec<String>> {
        list_module_dirs(&self.published_root)
    }

    /// Every module known in either location, sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if either root exists but cannot be read.
    pub fn all_modules(&self) -> Result<Vec<String>> {
        let mut modules = self.package_modules()?;
        modules.extend(self.published_modules()?);
        modules.sort();
        modules.dedup();
        Ok(modules)
    }

    #[must_use]
    pub fn locate(&self, name: &str) -> ModuleLocation {
        ModuleLocation {
            name: name.to_string(),
            in_package: self.package_module_dir(name).is_dir(),
            published: self.published_module_dir(name).is_dir(),
        }
    }

    /// The copy the host runs; published wins over vendored.
    #[must_use]
    pub fn source(&self, name: &str) -> Option<ModuleSource> {
        self.locate(name).source()
    }
}

/// Lists immediate subdirectory names of `root`; a missing root is empty.
fn list_module_dirs(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("Failed to list modules in {}", root.display()))?;
        if entry.file_type().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
