//! Access to the externally maintained list of executed migrations.
//!
//! The host application owns this list; modman only reads it. Identifiers
//! appear in two conventions, with and without the file extension, and both
//! are matched.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Source of migration identifiers that have already run.
pub trait AppliedMigrations {
    /// Every recorded identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn applied(&self) -> Result<Vec<String>>;
}

/// Applied-migrations ledger stored as a text file, one identifier per line.
/// Blank lines and lines starting with `#` are ignored.
#[derive(Debug, Clone)]
pub struct FileAppliedMigrations {
    /// Location of the ledger file
    path: PathBuf,
}

impl FileAppliedMigrations {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AppliedMigrations for FileAppliedMigrations {
    fn applied(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Failed to read applied migrations from {}",
                self.path.display()
            )
        })?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect())
    }
}

impl AppliedMigrations for Vec<String> {
    fn applied(&self) -> Result<Vec<String>> {
        Ok(self.clone())
    }
}

/// Lookup set over applied identifiers in both naming conventions.
#[derive(Debug, Default)]
pub struct AppliedSet {
    /// Identifiers as recorded, plus each one with `.{extension}` appended
    /// when it lacked it
    names: HashSet<String>,
}

impl AppliedSet {
    /// Builds the set, normalising identifiers without the extension.
    #[must_use]
    pub fn new(identifiers: Vec<String>, extension: &str) -> Self {
        let suffix = format!(".{}", extension.trim_start_matches('.'));
        let mut names = HashSet::with_capacity(identifiers.len() * 2);
        for id in identifiers {
            if !id.ends_with(&suffix) {
                names.insert(format!("{id}{suffix}"));
            }
            names.insert(id);
        }
        Self { names }
    }

    /// Whether a migration file has run, matching by full name or by stem.
    #[must_use]
    pub fn contains(&self, file_name: &str) -> bool {
        if self.names.contains(file_name) {
            return true;
        }
        Path::new(file_name)
            .file_stem()
            .is_some_and(|stem| self.names.contains(stem.to_string_lossy().as_ref()))
    }
}
