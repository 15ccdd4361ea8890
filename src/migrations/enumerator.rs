//! Migration file discovery.
//!
//! A module's migrations may live in the vendored copy, the published copy,
//! or both. Only immediate files count; subdirectories are not descended.
//! Hidden files (`.gitkeep`) are not migrations. Symlinked files count.

use crate::layout::Layout;
use crate::utils::is_hidden_entry;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{Level, debug, span};
use walkdir::WalkDir;

/// Lists migration file names for modules of one project.
pub struct MigrationEnumerator<'a> {
    /// Project layout supplying the two migration roots per module
    layout: &'a Layout,
}

impl<'a> MigrationEnumerator<'a> {
    #[must_use]
    pub const fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Base names of every migration file for `module`, deduplicated across
    /// the vendored and published directories. Missing directories
    /// contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing migrations directory cannot be read.
    pub fn migration_files(&self, module: &str) -> Result<BTreeSet<String>> {
        let span = span!(Level::DEBUG, "migration_files", module);
        let _guard = span.enter();

        let mut migrations = BTreeSet::new();
        for dir in self.layout.migration_dirs(module) {
            let found = list_files(&dir)?;
            debug!(dir = %dir.display(), count = found.len(), "Scanned migrations directory");
            migrations.extend(found);
        }

        Ok(migrations)
    }
}

/// Immediate, non-hidden file names in `dir`; a missing directory is empty.
fn list_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_hidden_entry(entry));
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(files)
}
