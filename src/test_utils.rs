pub mod fixtures {
    use crate::{ModmanContext, config::Config};
    use anyhow::Result;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A throwaway host project with the default layout.
    pub struct TestProject {
        pub temp_dir: TempDir,
        pub ctx: ModmanContext,
    }

    impl TestProject {
        pub fn new() -> Result<Self> {
            Self::with_config(Config::default())
        }

        pub fn with_config(config: Config) -> Result<Self> {
            let temp_dir = tempfile::tempdir()?;
            let config_path = temp_dir.path().join(crate::DEFAULT_CONFIG_FILE);
            config.save(&config_path)?;

            let ctx = ModmanContext::new_explicit(temp_dir.path().to_path_buf(), config_path)?;
            Ok(Self { temp_dir, ctx })
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

        pub fn write_published_file(
            &self,
            module: &str,
            rel: &str,
            content: &str,
        ) -> Result<PathBuf> {
            Self::write(&self.ctx.layout.published_module_dir(module).join(rel), content)
        }

        /// Writes the vendored descriptor for `module`.
        pub fn write_descriptor(&self, module: &str, json: &str) -> Result<PathBuf> {
            let file = self.ctx.layout.descriptor_file.clone();
            self.write_package_file(module, &file, json)
        }

        pub fn write_package_migration(&self, module: &str, name: &str) -> Result<PathBuf> {
            let dir = &self.ctx.layout.migration_dirs(module)[0];
            Self::write(&dir.join(name), "<?php\n")
        }

        pub fn write_published_migration(&self, module: &str, name: &str) -> Result<PathBuf> {
            let dir = &self.ctx.layout.migration_dirs(module)[1];
            Self::write(&dir.join(name), "<?php\n")
        }

        /// Writes the activation file with the given flags.
        pub fn write_statuses(&self, entries: &[(&str, bool)]) -> Result<PathBuf> {
            let map: serde_json::Map<String, serde_json::Value> = entries
                .iter()
                .map(|(name, enabled)| ((*name).to_string(), serde_json::Value::Bool(*enabled)))
                .collect();
            let json = serde_json::to_string_pretty(&map)?;
            Self::write(&self.ctx.layout.status_file, &json)
        }

        /// Writes the applied-migrations list, one identifier per line.
        pub fn write_applied(&self, ids: &[&str]) -> Result<PathBuf> {
            Self::write(&self.ctx.layout.applied_migrations, &ids.join("\n"))
        }
    }
}
