//! One-hop dependency presence checks.
//!
//! A dependency is satisfied when the named module has a readable descriptor
//! with some version. No transitive resolution, no cycle detection and no
//! version ranges; use [`ModuleRegistry::version_satisfies`] for ad hoc range
//! checks.

use super::descriptor::ModuleRegistry;
use serde::Serialize;
use tracing::debug;

/// Resolution of a single declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEntry {
    pub name: String,
    pub version: Option<String>,
    pub satisfied: bool,
}

/// Result of checking every declared dependency of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct DependencyStatus {
    pub satisfied: Vec<DependencyEntry>,
    pub missing: Vec<DependencyEntry>,
    pub all_satisfied: bool,
}

impl ModuleRegistry<'_> {
    /// Checks each entry of the module's `requires` list. Unknown modules have
    /// no requirements and are therefore vacuously satisfied.
    #[must_use]
    pub fn dependencies_satisfied(&self, name: &str) -> DependencyStatus {
        let mut satisfied = Vec::new();
        let mut missing = Vec::new();

        for dependency in self.dependencies(name) {
            match self.version(&dependency) {
                Some(version) => satisfied.push(DependencyEntry {
                    name: dependency,
                    version: Some(version),
                    satisfied: true,
                }),
                None => {
                    debug!(module = name, dependency = %dependency, "Dependency missing");
                    missing.push(DependencyEntry {
                        name: dependency,
                        version: None,
                        satisfied: false,
                    });
                }
            }
        }

        DependencyStatus {
            all_satisfied: missing.is_empty(),
            satisfied,
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::TestProject;
    use anyhow::Result;

    #[test]
    fn test_post_depends_on_category() -> Result<()> {
        let project = TestProject::new()?;
        project.write_descriptor("Post", r#"{"version":"1.2.0","requires":["Category"]}"#)?;
        project.write_descriptor("Category", r#"{"version":"1.0.0"}"#)?;

        let registry = ModuleRegistry::new(&project.ctx.layout);
        let status = registry.dependencies_satisfied("Post");

        assert_eq!(
            status.satisfied,
            vec![DependencyEntry {
                name: "Category".to_string(),
                version: Some("1.0.0".to_string()),
                satisfied: true,
            }]
        );
        assert!(status.missing.is_empty());
        assert!(status.all_satisfied);
        Ok(())
    }

    #[test]
    fn test_missing_and_versionless_dependencies() -> Result<()> {
        let project = TestProject::new()?;
        project.write_descriptor(
            "Post",
            r#"{"version":"1.2.0","requires":["Category","Tag","Ghost","Category"]}"#,
        )?;
        project.write_descriptor("Category", r#"{"version":"1.0.0"}"#)?;
        project.write_descriptor("Tag", r#"{"description":"no version"}"#)?;

        let registry = ModuleRegistry::new(&project.ctx.layout);
        let status = registry.dependencies_satisfied("Post");

        let satisfied: Vec<&str> = status.satisfied.iter().map(|d| d.name.as_str()).collect();
        let missing: Vec<&str> = status.missing.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(satisfied, vec!["Category", "Category"]);
        assert_eq!(missing, vec!["Tag", "Ghost"]);
        assert!(status.missing.iter().all(|d| d.version.is_none() && !d.satisfied));
        assert!(!status.all_satisfied);
        Ok(())
    }

    #[test]
    fn test_empty_requires_is_vacuously_satisfied() -> Result<()> {
        let project = TestProject::new()?;
        project.write_descriptor("Menu", r#"{"version":"1.0.0","requires":[]}"#)?;

        let registry = ModuleRegistry::new(&project.ctx.layout);
        assert!(registry.dependencies_satisfied("Menu").all_satisfied);
        assert!(registry.dependencies_satisfied("Unknown").all_satisfied);
        Ok(())
    }
}
