use anyhow::Result;
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;

/// Flags configuration keys that modman does not recognise, usually typos.
pub struct ConfigValidator {
    /// Fully-qualified keys (`section.field`) that modman reads
    known_fields: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = [
            "core.package_path",
            "core.published_path",
            "core.state_dir",
            "core.status_file",
            "core.applied_migrations",
            "modules.names",
            "modules.descriptor_file",
            "modules.migrations_dir",
            "migrations.extension",
            "diff.ignore_patterns",
            "diff.preview_lines",
            "diff.preview_width",
            "diff.algorithm",
        ]
        .into_iter()
        .collect();

        Self { known_fields }
    }

    /// Returns every unknown key in the given TOML content, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML
    pub fn unknown_fields(&self, content: &str) -> Result<Vec<String>> {
        let parsed: toml::Value = toml::from_str(content)?;
        let mut unknown = Vec::new();
        self.check_table(&parsed, "", &mut unknown);
        unknown.sort();
        Ok(unknown)
    }

    /// Validate a config file on disk and print a warning block for unknown keys
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn validate_config_file(&self, config_path: &Path) -> Result<()> {
        if !config_path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(config_path)?;
        let unknown = self.unknown_fields(&content)?;

        if !unknown.is_empty() {
            eprintln!("{}", "Configuration warnings:".yellow().bold());
            for field in &unknown {
                eprintln!("  Unknown configuration field: {}", field.yellow());
            }
            eprintln!();
        }

        Ok(())
    }

    /// Recursively walks a TOML table collecting keys outside `known_fields`.
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        let toml::Value::Table(map) = table else {
            return;
        };

        for (key, value) in map {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if self.known_fields.contains(full_key.as_str()) {
                continue;
            }

            if matches!(value, toml::Value::Table(_)) {
                self.check_table(value, &full_key, unknown);
            } else {
                unknown.push(full_key);
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fields_pass() -> Result<()> {
        let validator = ConfigValidator::new();
        let unknown = validator.unknown_fields(
            "[core]\npackage_path = \"vendor\"\n[diff]\nignore_patterns = [\"*.swp\"]\n",
        )?;
        assert!(unknown.is_empty());
        Ok(())
    }

    #[test]
    fn test_typos_reported() -> Result<()> {
        let validator = ConfigValidator::new();
        let unknown = validator.unknown_fields(
            "[core]\npublish_path = \"Modules\"\n[diff]\npreview_line = 3\n[extra]\nx = 1\n",
        )?;
        assert_eq!(
            unknown,
            vec!["core.publish_path", "diff.preview_line", "extra.x"]
        );
        Ok(())
    }
}
