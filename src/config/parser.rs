use super::Config;
use anyhow::{Context, Result};
use std::path::Path;

/// Reads and validates a TOML config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or holds
/// values that fail validation.
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config_str(&content)
}

/// Parses and validates config content.
///
/// # Errors
///
/// Returns an error if the content is not valid TOML or fails validation.
pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse TOML config")?;

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.core.package_path.as_os_str().is_empty() {
        anyhow::bail!("core.package_path cannot be empty");
    }

    if config.core.published_path.as_os_str().is_empty() {
        anyhow::bail!("core.published_path cannot be empty");
    }

    if config.core.state_dir.as_os_str().is_empty() {
        anyhow::bail!("core.state_dir cannot be empty");
    }

    if config.modules.descriptor_file.trim().is_empty() {
        anyhow::bail!("modules.descriptor_file cannot be empty");
    }

    if config.diff.preview_lines == 0 || config.diff.preview_width == 0 {
        anyhow::bail!("Diff preview lines and width must be at least 1");
    }

    Ok(())
}
