#![allow(dead_code)]

use anyhow::Result;
use modman::ModmanContext;
use modman::config::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Throwaway host project with the default layout
pub struct TestProject {
    pub temp_dir: TempDir,
    pub ctx: ModmanContext,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join(modman::DEFAULT_CONFIG_FILE);
        config.save(&config_path)?;

        let ctx = ModmanContext::new_explicit(temp_dir.path().to_path_buf(), config_path)?;
        Ok(Self { temp_dir, ctx })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn write(path: &Path, content: &str) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(path.to_path_buf())
    }

    pub fn write_package_file(&self, module: &str, rel: &str, content: &str) -> Result<PathBuf> {
        Self::write(&self.ctx.layout.package_module_dir(module).join(rel), content)
    }

    pub fn write_published_file(&self, module: &str, rel: &str, content: &str) -> Result<PathBuf> {
        Self::write(&self.ctx.layout.published_module_dir(module).join(rel), content)
    }

    /// Vendored `module.json` with the given version and requirements.
    pub fn add_module(&self, module: &str, version: &str, requires: &[&str]) -> Result<PathBuf> {
        let descriptor = serde_json::json!({
            "name": module,
            "version": version,
            "description": format!("{module} module"),
            "requires": requires,
        });
        let file = self.ctx.layout.descriptor_file.clone();
        self.write_package_file(module, &file, &serde_json::to_string_pretty(&descriptor)?)
    }

    pub fn add_package_migration(&self, module: &str, name: &str) -> Result<PathBuf> {
        let dir = &self.ctx.layout.migration_dirs(module)[0];
        Self::write(&dir.join(name), "<?php\n")
    }

    pub fn add_published_migration(&self, module: &str, name: &str) -> Result<PathBuf> {
        let dir = &self.ctx.layout.migration_dirs(module)[1];
        Self::write(&dir.join(name), "<?php\n")
    }

    pub fn remove_package_migration(&self, module: &str, name: &str) -> Result<()> {
        fs::remove_file(self.ctx.layout.migration_dirs(module)[0].join(name))?;
        Ok(())
    }

    pub fn write_statuses(&self, entries: &[(&str, bool)]) -> Result<PathBuf> {
        let map: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|(name, enabled)| ((*name).to_string(), serde_json::Value::Bool(*enabled)))
            .collect();
        Self::write(&self.ctx.layout.status_file, &serde_json::to_string_pretty(&map)?)
    }

    pub fn write_applied(&self, ids: &[&str]) -> Result<PathBuf> {
        Self::write(&self.ctx.layout.applied_migrations, &ids.join("\n"))
    }

    /// The `modman` binary pointed at this project, colours off.
    pub fn cmd(&self) -> Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin("modman")?;
        cmd.env(modman::PROJECT_ROOT_ENV, self.path())
            .env_remove(modman::CONFIG_PATH_ENV)
            .env_remove(modman::output::LOG_ENV)
            .env("NO_COLOR", "1");
        Ok(cmd)
    }
}
