//! Presence and content-hash comparison of two directory trees.
//!
//! Paths are compared relative to their own root with `/` separators, so two
//! copies of a module compare equal regardless of where they live. Files
//! present on both sides are hashed (xxHash3-128, on the rayon pool) and
//! reported as modified when the digests differ.

use crate::config::DiffConfig;
use crate::utils::hash::hash_files_parallel;
use crate::utils::paths::to_slash_relative;
use crate::utils::{compile_patterns, is_hidden_entry, should_ignore};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span};
use walkdir::WalkDir;

/// Directory key used for files at the tree root.
pub const ROOT_GROUP: &str = ".";

/// Options applied to both sides of a tree comparison.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Relative paths matching any of these are left out of both trees
    pub ignore_patterns: Vec<glob::Pattern>,
}

impl DiffOptions {
    #[must_use]
    pub fn from_config(config: &DiffConfig) -> Self {
        Self {
            ignore_patterns: compile_patterns(&config.ignore_patterns),
        }
    }
}

/// Partition of two file sets plus the common files whose content differs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileTreeDiff {
    pub only_in_left: BTreeSet<String>,
    pub only_in_right: BTreeSet<String>,
    pub common: BTreeSet<String>,
    /// Subset of `common`
    pub modified: BTreeSet<String>,
}

impl FileTreeDiff {
    /// True when the trees differ in membership or in any file's content.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.only_in_left.is_empty() || !self.only_in_right.is_empty() || !self.modified.is_empty()
    }
}

/// Every non-hidden file under `root`, relative and slash-separated.
/// Hidden files and hidden directories are skipped; symlinks are followed.
/// A missing root is an empty tree.
///
/// # Errors
///
/// Returns an error if an existing directory cannot be walked.
pub fn list_files(root: &Path, options: &DiffOptions) -> Result<BTreeSet<String>> {
    let mut files = BTreeSet::new();
    if !root.is_dir() {
        debug!(root = %root.display(), "Tree root missing, treating as empty");
        return Ok(files);
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_hidden_entry(entry));
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(relative) = to_slash_relative(entry.path(), root) else {
            continue;
        };
        if should_ignore(&relative, &options.ignore_patterns) {
            debug!(path = %relative, "Ignored by pattern");
            continue;
        }
        files.insert(relative);
    }

    Ok(files)
}

/// Compares the tree at `left` with the tree at `right`.
///
/// # Errors
///
/// Returns an error if either tree cannot be walked or a common file cannot
/// be hashed.
pub fn diff_trees(left: &Path, right: &Path, options: &DiffOptions) -> Result<FileTreeDiff> {
    let span = span!(
        Level::DEBUG,
        "diff_trees",
        left = %left.display(),
        right = %right.display()
    );
    let _guard = span.enter();

    let left_files = list_files(left, options)?;
    let right_files = list_files(right, options)?;

    let only_in_left: BTreeSet<String> = left_files.difference(&right_files).cloned().collect();
    let only_in_right: BTreeSet<String> = right_files.difference(&left_files).cloned().collect();
    let common: BTreeSet<String> = left_files.intersection(&right_files).cloned().collect();

    let modified = modified_files(left, right, &common)?;

    info!(
        only_in_left = only_in_left.len(),
        only_in_right = only_in_right.len(),
        common = common.len(),
        modified = modified.len(),
        "Tree comparison complete"
    );

    Ok(FileTreeDiff {
        only_in_left,
        only_in_right,
        common,
        modified,
    })
}

/// Common paths whose content hashes differ between the two roots.
fn modified_files(
    left: &Path,
    right: &Path,
    common: &BTreeSet<String>,
) -> Result<BTreeSet<String>> {
    let left_paths: Vec<PathBuf> = common.iter().map(|rel| left.join(rel)).collect();
    let right_paths: Vec<PathBuf> = common.iter().map(|rel| right.join(rel)).collect();

    let left_hashes = hash_files_parallel(&left_paths)?;
    let right_hashes = hash_files_parallel(&right_paths)?;

    Ok(common
        .iter()
        .zip(left_hashes.iter().zip(&right_hashes))
        .filter(|(_, (l, r))| l != r)
        .map(|(path, _)| path.clone())
        .collect())
}

/// Groups relative paths by parent directory. Files at the root go under
/// [`ROOT_GROUP`]; each group keeps the full relative paths in order.
#[must_use]
pub fn group_by_directory<'a, I>(paths: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in paths {
        let dir = path
            .rsplit_once('/')
            .map_or(ROOT_GROUP, |(parent, _)| parent);
        groups.entry(dir.to_string()).or_default().push(path.clone());
    }
    for files in groups.values_mut() {
        files.sort();
    }
    groups
}
