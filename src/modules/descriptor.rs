//! Module descriptor (`module.json`) reading.
//!
//! Descriptors are optional. A missing file and a file that is not a JSON
//! object both read as "module unknown" so callers only ever handle one case.
//! Fields with unexpected types fall back to their defaults.

use crate::layout::Layout;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Static metadata shipped with a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModuleDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Display ordering only
    #[serde(default)]
    pub priority: i64,
    /// Declared dependencies in file order; duplicates are kept
    #[serde(default)]
    pub requires: Vec<String>,
}

impl ModuleDescriptor {
    /// Parses descriptor JSON. Anything that is not a JSON object yields
    /// `None`; inside an object each field is read leniently, so one
    /// mistyped field never hides the rest.
    ///
    /// - `version`: a string, or a number rendered as a string
    /// - `priority`: an integer or a numeric string, else 0
    /// - `keywords`: a list of strings or a single string
    /// - `requires`: string entries only
    ///
    /// `fallback_name` fills in `name` when the file omits it.
    #[must_use]
    pub fn parse(content: &str, fallback_name: &str) -> Option<Self> {
        let value = match serde_json::from_str::<Value>(content) {
            Ok(value) => value,
            Err(e) => {
                debug!(module = fallback_name, error = %e, "Descriptor is not valid JSON");
                return None;
            }
        };
        let Value::Object(fields) = value else {
            debug!(module = fallback_name, "Descriptor is not a JSON object");
            return None;
        };

        let name = fields
            .get("name")
            .and_then(scalar_string)
            .unwrap_or_else(|| fallback_name.to_string());

        Some(Self {
            name,
            version: fields.get("version").and_then(scalar_string),
            description: fields.get("description").and_then(scalar_string),
            keywords: fields.get("keywords").map(string_list).unwrap_or_default(),
            priority: fields.get("priority").map_or(0, integer_or_zero),
            requires: fields.get("requires").map(string_list).unwrap_or_default(),
        })
    }

    /// Reads and parses a descriptor file; unreadable files yield `None`.
    #[must_use]
    pub fn read(path: &Path, fallback_name: &str) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Descriptor not readable");
                return None;
            }
        };
        Self::parse(&content, fallback_name)
    }
}

/// Non-blank string or number as a trimmed string.
fn scalar_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn integer_or_zero(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// String entries of an array, or a lone string as a one-element list.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Read-only view over module descriptors for one project.
pub struct ModuleRegistry<'a> {
    /// Project layout used to locate descriptor files
    layout: &'a Layout,
}

impl<'a> ModuleRegistry<'a> {
    #[must_use]
    pub const fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        self.layout
    }

    /// Descriptor for `name`, from the package copy or, for modules that only
    /// exist published, from the published copy.
    #[must_use]
    pub fn module_data(&self, name: &str) -> Option<ModuleDescriptor> {
        self.layout
            .descriptor_paths(name)
            .iter()
            .find(|path| path.is_file())
            .and_then(|path| ModuleDescriptor::read(path, name))
    }

    /// The module's declared version, if it has a readable descriptor with one.
    #[must_use]
    pub fn version(&self, name: &str) -> Option<String> {
        self.module_data(name).and_then(|d| d.version)
    }

    /// Declared dependencies; empty for unknown modules.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Vec<String> {
        self.module_data(name)
            .map(|d| d.requires)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::TestProject;
    use anyhow::Result;

    #[test]
    fn test_parse_full_descriptor() {
        let descriptor = ModuleDescriptor::parse(
            r#"{"name":"Post","version":"1.2.0","description":"Blog posts","priority":10,"requires":["Category","Tag","Category"]}"#,
            "Post",
        )
        .unwrap();

        assert_eq!(descriptor.version.as_deref(), Some("1.2.0"));
        assert_eq!(descriptor.priority, 10);
        assert_eq!(descriptor.requires, vec!["Category", "Tag", "Category"]);
    }

    #[test]
    fn test_parse_defaults_and_fallback_name() {
        let descriptor = ModuleDescriptor::parse("{}", "Menu").unwrap();
        assert_eq!(descriptor.name, "Menu");
        assert_eq!(descriptor.version, None);
        assert_eq!(descriptor.priority, 0);
        assert!(descriptor.requires.is_empty());
    }

    #[test]
    fn test_parse_blank_version_is_absent() {
        let descriptor = ModuleDescriptor::parse(r#"{"version":"  "}"#, "Tag").unwrap();
        assert_eq!(descriptor.version, None);
    }

    #[test]
    fn test_parse_malformed_is_none() {
        assert!(ModuleDescriptor::parse("{ not json", "Post").is_none());
        assert!(ModuleDescriptor::parse("\"Post\"", "Post").is_none());
        assert!(ModuleDescriptor::parse("[1, 2]", "Post").is_none());
        assert!(ModuleDescriptor::parse("", "Post").is_none());
    }

    #[test]
    fn test_parse_mistyped_fields_are_lenient() {
        let descriptor = ModuleDescriptor::parse(
            r#"{"version":"1.0.0","priority":"5","keywords":"blog","requires":["Tag",3,null]}"#,
            "Category",
        )
        .unwrap();
        assert_eq!(descriptor.version.as_deref(), Some("1.0.0"));
        assert_eq!(descriptor.priority, 5);
        assert_eq!(descriptor.keywords, vec!["blog"]);
        assert_eq!(descriptor.requires, vec!["Tag"]);

        let numeric = ModuleDescriptor::parse(r#"{"version":1,"priority":"high"}"#, "Menu").unwrap();
        assert_eq!(numeric.version.as_deref(), Some("1"));
        assert_eq!(numeric.priority, 0);
        assert_eq!(numeric.name, "Menu");
    }

    #[test]
    fn test_mistyped_priority_keeps_dependency_satisfied() -> Result<()> {
        let project = TestProject::new()?;
        project.write_descriptor("Category", r#"{"version":"1.0.0","priority":"5"}"#)?;
        project.write_descriptor("Post", r#"{"version":"1.0.0","requires":["Category"]}"#)?;

        let registry = ModuleRegistry::new(&project.ctx.layout);
        assert_eq!(registry.version("Category").as_deref(), Some("1.0.0"));
        let status = registry.dependencies_satisfied("Post");
        assert!(status.all_satisfied);
        assert!(status.missing.is_empty());
        Ok(())
    }

    #[test]
    fn test_registry_missing_and_malformed_are_unknown() -> Result<()> {
        let project = TestProject::new()?;
        project.write_package_file("Tag", "module.json", "{{{")?;

        let registry = ModuleRegistry::new(&project.ctx.layout);
        assert!(registry.module_data("Nope").is_none());
        assert!(registry.module_data("Tag").is_none());
        assert_eq!(registry.version("Tag"), None);
        assert!(registry.dependencies("Tag").is_empty());
        Ok(())
    }

    #[test]
    fn test_registry_prefers_package_then_published() -> Result<()> {
        let project = TestProject::new()?;
        project.write_descriptor("Post", r#"{"version":"1.2.0"}"#)?;
        project.write_published_file("Post", "module.json", r#"{"version":"9.9.9"}"#)?;
        project.write_published_file("Custom", "module.json", r#"{"version":"0.1.0"}"#)?;

        let registry = ModuleRegistry::new(&project.ctx.layout);
        assert_eq!(registry.version("Post").as_deref(), Some("1.2.0"));
        assert_eq!(registry.version("Custom").as_deref(), Some("0.1.0"));
        Ok(())
    }
}
