//! Module activation flags (`modules_statuses.json`).
//!
//! The file is a JSON object mapping module names to booleans. It is loaded
//! once, changed in memory and written back atomically, so a crash mid-write
//! leaves the previous file intact. A missing file is created with the
//! configured modules enabled.

use super::naming::module_name;
use crate::utils::paths::write_atomic;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of an enable/disable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The flag flipped; the file needs saving.
    Changed,
    /// The flag already had the requested value.
    Unchanged,
}

/// In-memory copy of the activation file.
#[derive(Debug, Clone)]
pub struct ModuleStatuses {
    /// File the flags were loaded from and are saved to
    path: PathBuf,
    /// Module name -> enabled
    modules: BTreeMap<String, bool>,
}

impl ModuleStatuses {
    /// Loads the activation file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not a JSON object of
    /// booleans.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Module status file not found: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read module status file: {}", path.display()))?;
        let modules: BTreeMap<String, bool> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid module status file: {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            modules,
        })
    }

    /// Loads the activation file, first writing one with every name in
    /// `defaults` enabled if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the default file cannot be written or the existing
    /// file is not a JSON object of booleans.
    pub fn load_or_create(path: &Path, defaults: &[String]) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        let statuses = Self::from_entries(
            path.to_path_buf(),
            defaults.iter().map(|name| (name.clone(), true)),
        );
        statuses.save()?;
        info!(path = %path.display(), modules = defaults.len(), "Created module status file");
        Ok(statuses)
    }

    /// Builds a status set that will be saved to `path`.
    #[must_use]
    pub fn from_entries(path: PathBuf, entries: impl IntoIterator<Item = (String, bool)>) -> Self {
        Self {
            path,
            modules: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maps user input to a key in the file.
    ///
    /// Tries the input verbatim, then its canonical module name, then a
    /// case-insensitive match on either, so `Settings`, `posts` and `tag`
    /// all resolve.
    #[must_use]
    pub fn resolve(&self, input: &str) -> Option<String> {
        if self.modules.contains_key(input) {
            return Some(input.to_string());
        }

        let canonical = module_name(input);
        if self.modules.contains_key(&canonical) {
            return Some(canonical);
        }

        self.modules
            .keys()
            .find(|key| key.eq_ignore_ascii_case(input) || key.eq_ignore_ascii_case(&canonical))
            .cloned()
    }

    /// Whether a module is enabled; `None` if the file does not list it.
    #[must_use]
    pub fn is_enabled(&self, input: &str) -> Option<bool> {
        let key = self.resolve(input)?;
        self.modules.get(&key).copied()
    }

    /// Names of enabled modules, sorted.
    #[must_use]
    pub fn enabled_modules(&self) -> Vec<&str> {
        self.modules
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Every entry, sorted by module name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.modules.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }

    /// Sets a module's flag. Returns the resolved module name and whether the
    /// flag changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the module is not listed in the file.
    pub fn set(&mut self, input: &str, enabled: bool) -> Result<(String, Toggle)> {
        let key = self.resolve(input).ok_or_else(|| {
            anyhow::anyhow!("Module {} not found in status file", module_name(input))
        })?;

        let flag = self
            .modules
            .get_mut(&key)
            .ok_or_else(|| anyhow::anyhow!("Module {key} not found in status file"))?;
        if *flag == enabled {
            return Ok((key, Toggle::Unchanged));
        }

        *flag = enabled;
        info!(module = %key, enabled, "Module status changed");
        Ok((key, Toggle::Changed))
    }

    /// # Errors
    ///
    /// Returns an error if the module is not listed in the file.
    pub fn enable(&mut self, input: &str) -> Result<(String, Toggle)> {
        self.set(input, true)
    }

    /// # Errors
    ///
    /// Returns an error if the module is not listed in the file.
    pub fn disable(&mut self, input: &str) -> Result<(String, Toggle)> {
        self.set(input, false)
    }

    /// Writes the flags back as pretty-printed JSON via temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the atomic write fails.
    pub fn save(&self) -> Result<()> {
        let mut json = serde_json::to_string_pretty(&self.modules)
            .context("Failed to serialize module statuses")?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_statuses(dir: &Path, content: &str) -> Result<PathBuf> {
        let path = dir.join("modules_statuses.json");
        std::fs::write(&path, content)?;
        Ok(path)
    }

    #[test]
    fn test_enable_disable_round_trip() -> Result<()> {
        let temp = TempDir::new()?;
        let path = write_statuses(temp.path(), r#"{"Post": true, "Tag": false}"#)?;

        let mut statuses = ModuleStatuses::load(&path)?;
        assert_eq!(statuses.enable("tags")?, ("Tag".to_string(), Toggle::Changed));
        assert_eq!(statuses.disable("posts")?, ("Post".to_string(), Toggle::Changed));
        statuses.save()?;

        let reloaded = ModuleStatuses::load(&path)?;
        assert_eq!(reloaded.is_enabled("Tag"), Some(true));
        assert_eq!(reloaded.is_enabled("Post"), Some(false));
        assert_eq!(reloaded.enabled_modules(), vec!["Tag"]);
        Ok(())
    }

    #[test]
    fn test_already_enabled_is_unchanged() -> Result<()> {
        let temp = TempDir::new()?;
        let path = write_statuses(temp.path(), r#"{"Post": true}"#)?;

        let mut statuses = ModuleStatuses::load(&path)?;
        assert_eq!(statuses.enable("Post")?.1, Toggle::Unchanged);
        Ok(())
    }

    #[test]
    fn test_resolve_keeps_plural_module_names() -> Result<()> {
        let temp = TempDir::new()?;
        let path = write_statuses(temp.path(), r#"{"Settings": true, "LogViewer": false}"#)?;

        let statuses = ModuleStatuses::load(&path)?;
        assert_eq!(statuses.resolve("Settings").as_deref(), Some("Settings"));
        assert_eq!(statuses.resolve("settings").as_deref(), Some("Settings"));
        assert_eq!(statuses.resolve("log-viewer").as_deref(), Some("LogViewer"));
        Ok(())
    }

    #[test]
    fn test_unknown_module_is_error() -> Result<()> {
        let temp = TempDir::new()?;
        let path = write_statuses(temp.path(), r#"{"Post": true}"#)?;

        let mut statuses = ModuleStatuses::load(&path)?;
        let err = statuses.enable("menus").unwrap_err();
        assert!(err.to_string().contains("Module Menu not found"));
        Ok(())
    }

    #[test]
    fn test_missing_and_malformed_files() -> Result<()> {
        let temp = TempDir::new()?;
        assert!(ModuleStatuses::load(&temp.path().join("absent.json")).is_err());

        let path = write_statuses(temp.path(), r#"{"Post": "yes"}"#)?;
        assert!(ModuleStatuses::load(&path).is_err());
        assert!(ModuleStatuses::load_or_create(&path, &[]).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_file_bootstrapped_with_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("modules_statuses.json");
        let names: Vec<String> = ["Post", "Category", "Tag", "Menu"]
            .iter()
            .map(ToString::to_string)
            .collect();

        let statuses = ModuleStatuses::load_or_create(&path, &names)?;
        assert!(path.exists());
        assert_eq!(statuses.enabled_modules(), vec!["Category", "Menu", "Post", "Tag"]);

        let reloaded = ModuleStatuses::load(&path)?;
        assert_eq!(reloaded.is_enabled("Tag"), Some(true));
        Ok(())
    }

    #[test]
    fn test_existing_file_is_not_overwritten() -> Result<()> {
        let temp = TempDir::new()?;
        let path = write_statuses(temp.path(), r#"{"Post": false}"#)?;

        let statuses = ModuleStatuses::load_or_create(&path, &["Post".to_string()])?;
        assert_eq!(statuses.is_enabled("Post"), Some(false));
        Ok(())
    }
}
