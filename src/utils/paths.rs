use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Ensures parent directories exist for a given path
///
/// # Errors
///
/// Returns an error if the parent directories cannot be created
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create parent directories for {}", path.display())
        })?;
    }
    Ok(())
}

/// Expands tilde in path to home directory
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    if let Some(path_str) = path.to_str() {
        if path_str == "~" {
            return dirs::home_dir().context("Could not find home directory");
        }
        if let Some(rest) = path_str.strip_prefix("~/") {
            let home = dirs::home_dir().context("Could not find home directory")?;
            return Ok(home.join(rest));
        }
    }
    Ok(path.to_path_buf())
}

/// Resolves a configured path against `base` after tilde expansion.
///
/// # Errors
///
/// Returns an error if tilde expansion fails
pub fn resolve_against(base: &Path, path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

/// Renders `path` relative to `root` with `/` separators on every platform.
///
/// Returns `None` when `path` is not under `root`.
#[must_use]
pub fn to_slash_relative(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Writes `data` to `path` by writing a sibling temp file and renaming it over
/// the target, so readers never observe a partially written file.
///
/// # Errors
///
/// Returns an error if the temp file cannot be created, written, synced or renamed
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    ensure_parent_dirs(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(data)
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
