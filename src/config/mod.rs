pub mod parser;
pub mod validator;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default module list used by bulk operations (`track`, `detect-updates`).
pub const DEFAULT_MODULES: &[&str] = &["Post", "Category", "Tag", "Menu"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,

    /// Module naming and per-module file layout
    #[serde(default)]
    pub modules: ModulesConfig,

    #[serde(default)]
    pub migrations: MigrationsConfig,

    /// Package vs. published tree comparison
    #[serde(default)]
    pub diff: DiffConfig,
}

/// Filesystem roots, resolved against the project root when relative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default = "default_package_path")]
    pub package_path: PathBuf,
    #[serde(default = "default_published_path")]
    pub published_path: PathBuf,
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    #[serde(default = "default_status_file")]
    pub status_file: PathBuf,
    /// External list of executed migrations; defaults to `<state_dir>/applied_migrations`
    #[serde(default)]
    pub applied_migrations: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesConfig {
    #[serde(default = "default_module_names")]
    pub names: Vec<String>,
    #[serde(default = "default_descriptor_file")]
    pub descriptor_file: String,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationsConfig {
    /// Extension appended to applied-migration identifiers that lack one
    #[serde(default = "default_extension")]
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_preview_lines")]
    pub preview_lines: usize,
    #[serde(default = "default_preview_width")]
    pub preview_width: usize,
    #[serde(default)]
    pub algorithm: DiffAlgorithm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    #[default]
    Myers,
    Patience,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            package_path: default_package_path(),
            published_path: default_published_path(),
            state_dir: default_state_dir(),
            status_file: default_status_file(),
            applied_migrations: None,
        }
    }
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            names: default_module_names(),
            descriptor_file: default_descriptor_file(),
            migrations_dir: default_migrations_dir(),
        }
    }
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: default_ignore_patterns(),
            preview_lines: default_preview_lines(),
            preview_width: default_preview_width(),
            algorithm: DiffAlgorithm::Myers,
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot read or parse the configuration file
    /// - Configuration file contains invalid TOML or invalid values
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            // Create default config if it doesn't exist
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        parser::parse_config_file(path)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot write to the file
    /// - TOML serialization fails
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        crate::utils::paths::write_atomic(path, toml_str.as_bytes())
            .with_context(|| format!("Failed to save config to {}", path.display()))
    }

    /// Get a configuration value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let (section, field) = key.split_once('.')?;

        match (section, field) {
            ("core", "package_path") => Some(self.core.package_path.display().to_string()),
            ("core", "published_path") => Some(self.core.published_path.display().to_string()),
            ("core", "state_dir") => Some(self.core.state_dir.display().to_string()),
            ("core", "status_file") => Some(self.core.status_file.display().to_string()),
            ("core", "applied_migrations") => self
                .core
                .applied_migrations
                .as_ref()
                .map(|p| p.display().to_string()),
            ("modules", "names") => Some(self.modules.names.join(",")),
            ("modules", "descriptor_file") => Some(self.modules.descriptor_file.clone()),
            ("modules", "migrations_dir") => Some(self.modules.migrations_dir.clone()),
            ("migrations", "extension") => Some(self.migrations.extension.clone()),
            ("diff", "ignore_patterns") => Some(self.diff.ignore_patterns.join(",")),
            ("diff", "preview_lines") => Some(self.diff.preview_lines.to_string()),
            ("diff", "preview_width") => Some(self.diff.preview_width.to_string()),
            ("diff", "algorithm") => Some(format!("{:?}", self.diff.algorithm).to_lowercase()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key format is invalid (must be section.key)
    /// - The key is unknown
    /// - The value is invalid for the key
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("Invalid configuration key: {key}"))?;

        match (section, field) {
            ("core", "package_path") => self.core.package_path = non_empty_path(&value)?,
            ("core", "published_path") => self.core.published_path = non_empty_path(&value)?,
            ("core", "state_dir") => self.core.state_dir = non_empty_path(&value)?,
            ("core", "status_file") => self.core.status_file = non_empty_path(&value)?,
            ("core", "applied_migrations") => {
                self.core.applied_migrations = Some(non_empty_path(&value)?);
            }
            ("modules", "names") => self.modules.names = split_list(&value),
            ("modules", "descriptor_file") => self.modules.descriptor_file = value,
            ("modules", "migrations_dir") => self.modules.migrations_dir = value,
            ("migrations", "extension") => {
                self.migrations.extension = value.trim_start_matches('.').to_string();
            }
            ("diff", "ignore_patterns") => self.diff.ignore_patterns = split_list(&value),
            ("diff", "preview_lines") => {
                self.diff.preview_lines = parse_positive(&value)?;
            }
            ("diff", "preview_width") => {
                self.diff.preview_width = parse_positive(&value)?;
            }
            ("diff", "algorithm") => {
                self.diff.algorithm = match value.to_lowercase().as_str() {
                    "myers" => DiffAlgorithm::Myers,
                    "patience" => DiffAlgorithm::Patience,
                    _ => anyhow::bail!("Unknown diff algorithm: {value} (expected myers or patience)"),
                };
            }
            _ => return Err(anyhow::anyhow!("Unknown configuration key: {key}")),
        }
        Ok(())
    }

    /// Unset a configuration value by key
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or cannot be unset
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match key {
            "core.applied_migrations" => self.core.applied_migrations = None,
            "diff.ignore_patterns" => self.diff.ignore_patterns.clear(),
            _ => return Err(anyhow::anyhow!("Cannot unset configuration key: {key}")),
        }
        Ok(())
    }
}

fn non_empty_path(value: &str) -> Result<PathBuf> {
    if value.trim().is_empty() {
        anyhow::bail!("Path value cannot be empty");
    }
    Ok(PathBuf::from(value))
}

fn parse_positive(value: &str) -> Result<usize> {
    let n: usize = value
        .parse()
        .with_context(|| format!("Invalid number: {value}"))?;
    if n == 0 {
        anyhow::bail!("Value must be at least 1");
    }
    Ok(n)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// Default functions for serde
fn default_package_path() -> PathBuf {
    PathBuf::from("vendor/nasirkhan/module-manager/src/Modules")
}

fn default_published_path() -> PathBuf {
    PathBuf::from("Modules")
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".modman")
}

fn default_status_file() -> PathBuf {
    PathBuf::from("modules_statuses.json")
}

fn default_module_names() -> Vec<String> {
    DEFAULT_MODULES.iter().map(|s| (*s).to_string()).collect()
}

fn default_descriptor_file() -> String {
    "module.json".to_string()
}

fn default_migrations_dir() -> String {
    "database/migrations".to_string()
}

fn default_extension() -> String {
    "php".to_string()
}

fn default_ignore_patterns() -> Vec<String> {
    vec![".DS_Store".to_string(), "*.swp".to_string(), "*.tmp".to_string()]
}

const fn default_preview_lines() -> usize {
    5
}

const fn default_preview_width() -> usize {
    50
}
