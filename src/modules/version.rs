//! Module version queries and version ordering.

use super::descriptor::ModuleRegistry;
use semver::Version;
use serde::Serialize;
use std::cmp::Ordering;

/// Version shown for modules without a readable version.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Changelog file read from the module's package (or published) directory.
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Listing projection of a module descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSummary {
    pub name: String,
    pub version: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub priority: i64,
    pub requires: Vec<String>,
}

impl ModuleRegistry<'_> {
    /// Summaries for `names` in the given order; unreadable modules get
    /// [`UNKNOWN_VERSION`] and empty metadata.
    #[must_use]
    pub fn all_versions(&self, names: &[String]) -> Vec<ModuleSummary> {
        names
            .iter()
            .map(|name| {
                let data = self.module_data(name).unwrap_or_default();
                ModuleSummary {
                    name: name.clone(),
                    version: data.version.unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
                    description: data.description.unwrap_or_default(),
                    keywords: data.keywords,
                    priority: data.priority,
                    requires: data.requires,
                }
            })
            .collect()
    }

    /// Summaries ordered by priority, highest first. Equal priorities keep
    /// the order of `names`.
    #[must_use]
    pub fn modules_by_priority(&self, names: &[String]) -> Vec<ModuleSummary> {
        let mut summaries = self.all_versions(names);
        summaries.sort_by(|a, b| b.priority.cmp(&a.priority));
        summaries
    }

    /// True iff the module has a version equal to `version`.
    #[must_use]
    pub fn version_matches(&self, name: &str, version: &str) -> bool {
        self.version(name)
            .is_some_and(|current| compare_versions(&current, version) == Ordering::Equal)
    }

    /// True iff the module has a version at or above `required`.
    ///
    /// This is an ad hoc helper; dependency checks only test presence.
    #[must_use]
    pub fn version_satisfies(&self, name: &str, required: &str) -> bool {
        self.version(name)
            .is_some_and(|current| compare_versions(&current, required) != Ordering::Less)
    }

    /// Contents of the module's changelog, if present.
    #[must_use]
    pub fn changelog(&self, name: &str) -> Option<String> {
        let layout = self.layout();
        [
            layout.package_module_dir(name).join(CHANGELOG_FILE),
            layout.published_module_dir(name).join(CHANGELOG_FILE),
        ]
        .iter()
        .find(|path| path.is_file())
        .and_then(|path| std::fs::read_to_string(path).ok())
    }
}

/// Orders two version strings.
///
/// Versions are compared as semantic versions, accepting a leading `v` and
/// one- or two-component cores (`1.2` is `1.2.0`). Anything that still does
/// not parse is compared segment by segment, numerically where possible.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_lenient(a), parse_lenient(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => compare_segments(a, b),
    }
}

fn parse_lenient(raw: &str) -> Option<Version> {
    let trimmed = raw.trim().trim_start_matches(['v', 'V']);
    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    let (core, suffix) = trimmed
        .find(['-', '+'])
        .map_or((trimmed, ""), |i| trimmed.split_at(i));
    let components = core.split('.').count();
    if core.is_empty() || components >= 3 {
        return None;
    }

    let padded = format!("{core}{}{suffix}", ".0".repeat(3 - components));
    Version::parse(&padded).ok()
}

fn compare_segments(a: &str, b: &str) -> Ordering {
    let left: Vec<&str> = a.trim().split(['.', '-', '+']).collect();
    let right: Vec<&str> = b.trim().split(['.', '-', '+']).collect();

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or("0");
        let r = right.get(i).copied().unwrap_or("0");
        let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
            (Ok(l), Ok(r)) => l.cmp(&r),
            _ => l.cmp(r),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
