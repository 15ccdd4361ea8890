//! Migration drift detection against recorded snapshots.

use super::ledger::{FileLedger, TrackedSnapshot};
use crate::layout::Layout;
use crate::migrations::{AppliedMigrations, AppliedSet, MigrationEnumerator};
use crate::modules::ModuleRegistry;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{Level, debug, info, span, warn};

/// Whether a module has a snapshot in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    NotTracked,
    Tracked,
}

impl TrackingStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotTracked => "not_tracked",
            Self::Tracked => "tracked",
        }
    }
}

/// Result of comparing a module's migrations with its last snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    pub status: TrackingStatus,
    /// Current migrations absent from the snapshot
    pub new_migrations: Vec<String>,
    /// Snapshot migrations no longer on disk
    pub removed_migrations: Vec<String>,
    pub tracked_version: Option<String>,
    pub last_checked: Option<DateTime<Utc>>,
}

impl DriftReport {
    /// Report for a module without a snapshot: everything on disk is new.
    fn not_tracked(current: BTreeSet<String>) -> Self {
        Self {
            status: TrackingStatus::NotTracked,
            new_migrations: current.into_iter().collect(),
            removed_migrations: Vec::new(),
            tracked_version: None,
            last_checked: None,
        }
    }

    #[must_use]
    pub fn total_new(&self) -> usize {
        self.new_migrations.len()
    }

    #[must_use]
    pub fn total_removed(&self) -> usize {
        self.removed_migrations.len()
    }

    /// True when anything was added or removed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.new_migrations.is_empty() || !self.removed_migrations.is_empty()
    }
}

/// Records migration snapshots and reports drift relative to them.
///
/// Holds no state of its own beyond the ledger location; every query reads
/// the filesystem and the ledger afresh.
pub struct DriftTracker<'a> {
    /// Project layout for locating migration directories
    layout: &'a Layout,
    /// Backing snapshot store
    ledger: FileLedger,
    /// Migration file extension used when matching applied identifiers
    extension: String,
}

impl<'a> DriftTracker<'a> {
    /// Creates a tracker using the ledger under the layout's state directory.
    #[must_use]
    pub fn new(layout: &'a Layout, extension: &str) -> Self {
        Self::with_ledger(layout, FileLedger::new(layout.ledger_path()), extension)
    }

    #[must_use]
    pub fn with_ledger(layout: &'a Layout, ledger: FileLedger, extension: &str) -> Self {
        Self {
            layout,
            ledger,
            extension: extension.to_string(),
        }
    }

    #[must_use]
    pub const fn ledger(&self) -> &FileLedger {
        &self.ledger
    }

    fn current_migrations(&self, module: &str) -> Result<BTreeSet<String>> {
        MigrationEnumerator::new(self.layout).migration_files(module)
    }

    /// Snapshots the module's current migrations under `version`, replacing
    /// any earlier snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the migration directories or the ledger cannot be
    /// accessed.
    pub fn track(&self, module: &str, version: &str) -> Result<TrackedSnapshot> {
        let span = span!(Level::DEBUG, "track", module, version);
        let _guard = span.enter();

        let migrations = self.current_migrations(module)?;
        let snapshot = TrackedSnapshot::new(module, version, &migrations, Utc::now());
        self.ledger.upsert(snapshot.clone())?;

        info!(
            module,
            version,
            migrations = snapshot.migrations.len(),
            "Tracked module migrations"
        );
        Ok(snapshot)
    }

    /// Tracks every named module that has a descriptor version, returning
    /// the `(module, version)` pairs recorded. Modules without a version are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Stops at the first module that cannot be tracked.
    pub fn track_all(
        &self,
        registry: &ModuleRegistry<'_>,
        names: &[String],
    ) -> Result<Vec<(String, String)>> {
        let mut tracked = Vec::new();
        for name in names {
            let Some(version) = registry.version(name) else {
                debug!(module = %name, "Skipping module without version");
                continue;
            };
            self.track(name, &version)?;
            tracked.push((name.clone(), version));
        }
        Ok(tracked)
    }

    /// The stored snapshot for `module`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    pub fn tracking_info(&self, module: &str) -> Result<Option<TrackedSnapshot>> {
        self.ledger.get(module)
    }

    /// Every stored snapshot keyed by module.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    pub fn all_tracking_info(&self) -> Result<BTreeMap<String, TrackedSnapshot>> {
        self.ledger.all()
    }

    /// Compares the module's migrations on disk with its snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the migration directories or the ledger cannot be
    /// read.
    pub fn compare_with_tracked(&self, module: &str) -> Result<DriftReport> {
        let span = span!(Level::DEBUG, "compare_with_tracked", module);
        let _guard = span.enter();

        let snapshot = self.tracking_info(module)?;
        let current = self.current_migrations(module)?;
        let Some(snapshot) = snapshot else {
            debug!(current = current.len(), "Module has no snapshot");
            return Ok(DriftReport::not_tracked(current));
        };

        let tracked = snapshot.migration_set();

        let new_migrations: Vec<String> = current.difference(&tracked).cloned().collect();
        let removed_migrations: Vec<String> = tracked.difference(&current).cloned().collect();
        debug!(
            new = new_migrations.len(),
            removed = removed_migrations.len(),
            "Compared against snapshot"
        );

        Ok(DriftReport {
            status: TrackingStatus::Tracked,
            new_migrations,
            removed_migrations,
            tracked_version: Some(snapshot.version),
            last_checked: Some(snapshot.last_checked),
        })
    }

    /// True iff the drift report lists any new or removed migration. Version
    /// changes alone do not count.
    ///
    /// # Errors
    ///
    /// Returns an error if the comparison fails.
    pub fn has_updates(&self, module: &str) -> Result<bool> {
        Ok(self.compare_with_tracked(module)?.has_changes())
    }

    /// Migrations that appeared since the last snapshot. A module that was
    /// never tracked reports every current migration.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger or the migration directories cannot be
    /// read.
    pub fn new_since_last_check(&self, module: &str) -> Result<BTreeSet<String>> {
        let current = self.current_migrations(module)?;
        match self.tracking_info(module)? {
            Some(snapshot) => {
                let tracked = snapshot.migration_set();
                Ok(current.difference(&tracked).cloned().collect())
            }
            None => Ok(current),
        }
    }

    /// Reads the applied list once for use with [`Self::pending_in`].
    ///
    /// Returns `None` when the list cannot be read.
    pub fn load_applied(&self, applied: &dyn AppliedMigrations) -> Option<AppliedSet> {
        match applied.applied() {
            Ok(ids) => Some(AppliedSet::new(ids, &self.extension)),
            Err(e) => {
                warn!(error = %e, "Applied migrations unavailable, treating all as pending");
                None
            }
        }
    }

    /// Current migrations of `module` absent from `applied`. Without an
    /// applied set every current migration is pending.
    ///
    /// # Errors
    ///
    /// Returns an error only if the migration directories cannot be read.
    pub fn pending_in(
        &self,
        module: &str,
        applied: Option<&AppliedSet>,
    ) -> Result<BTreeSet<String>> {
        let current = self.current_migrations(module)?;
        Ok(match applied {
            Some(applied) => current
                .into_iter()
                .filter(|name| !applied.contains(name))
                .collect(),
            None => current,
        })
    }

    /// Current migrations not yet recorded as applied.
    ///
    /// When the applied list cannot be read every current migration is
    /// reported pending.
    ///
    /// # Errors
    ///
    /// Returns an error only if the migration directories cannot be read.
    pub fn pending_migrations(
        &self,
        module: &str,
        applied: &dyn AppliedMigrations,
    ) -> Result<BTreeSet<String>> {
        let applied = self.load_applied(applied);
        self.pending_in(module, applied.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::FileAppliedMigrations;
    use crate::test_utils::fixtures::TestProject;

    fn tracker(project: &TestProject) -> DriftTracker<'_> {
        DriftTracker::new(&project.ctx.layout, "php")
    }

    #[test]
    fn test_untracked_module() -> Result<()> {
        let project = TestProject::new()?;
        project.write_package_migration("Menu", "a.php")?;
        project.write_published_migration("Menu", "b.php")?;

        let tracker = tracker(&project);
        let report = tracker.compare_with_tracked("Menu")?;

        assert_eq!(report.status, TrackingStatus::NotTracked);
        assert_eq!(report.new_migrations, vec!["a.php", "b.php"]);
        assert!(report.removed_migrations.is_empty());
        assert_eq!(report.total_new(), 2);
        assert!(report.tracked_version.is_none());
        assert!(tracker.has_updates("Menu")?);
        assert_eq!(tracker.new_since_last_check("Menu")?.len(), 2);
        assert!(tracker.tracking_info("Menu")?.is_none());
        Ok(())
    }

    struct CountingApplied {
        ids: Vec<String>,
        reads: std::cell::Cell<usize>,
    }

    impl AppliedMigrations for CountingApplied {
        fn applied(&self) -> Result<Vec<String>> {
            self.reads.set(self.reads.get() + 1);
            Ok(self.ids.clone())
        }
    }

    #[test]
    fn test_applied_list_read_once_across_modules() -> Result<()> {
        let project = TestProject::new()?;
        project.write_package_migration("Post", "2024_a.php")?;
        project.write_package_migration("Tag", "2024_b.php")?;
        project.write_package_migration("Tag", "2024_c.php")?;

        let source = CountingApplied {
            ids: vec!["2024_a".to_string(), "2024_b".to_string()],
            reads: std::cell::Cell::new(0),
        };
        let tracker = tracker(&project);
        let applied = tracker.load_applied(&source);

        assert!(tracker.pending_in("Post", applied.as_ref())?.is_empty());
        assert_eq!(
            tracker.pending_in("Tag", applied.as_ref())?,
            BTreeSet::from(["2024_c.php".to_string()])
        );
        assert_eq!(source.reads.get(), 1);

        let all = tracker.pending_in("Tag", None)?;
        assert_eq!(all.len(), 2);
        Ok(())
    }

    #[test]
    fn test_placeholder_files_never_drift_or_pend() -> Result<()> {
        let project = TestProject::new()?;
        project.write_package_migration("Post", "2024_a.php")?;
        project.write_package_migration("Post", ".gitkeep")?;
        project.write_applied(&["2024_a"])?;

        let tracker = tracker(&project);
        let report = tracker.compare_with_tracked("Post")?;
        assert_eq!(report.new_migrations, vec!["2024_a.php"]);

        let applied = FileAppliedMigrations::new(&project.ctx.layout.applied_migrations);
        assert!(tracker.pending_migrations("Post", &applied)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_untracked_without_migrations_has_no_updates() -> Result<()> {
        let project = TestProject::new()?;
        let tracker = tracker(&project);
        assert!(!tracker.has_updates("Settings")?);
        Ok(())
    }

    #[test]
    fn test_version_bump_alone_is_not_an_update() -> Result<()> {
        let project = TestProject::new()?;
        project.write_package_migration("Post", "a.php")?;

        let tracker = tracker(&project);
        tracker.track("Post", "1.0.0")?;
        let report = tracker.compare_with_tracked("Post")?;

        assert!(!report.has_changes());
        assert_eq!(report.tracked_version.as_deref(), Some("1.0.0"));
        assert!(!tracker.has_updates("Post")?);
        Ok(())
    }

    #[test]
    fn test_track_then_compare_is_clean() -> Result<()> {
        let project = TestProject::new()?;
        project.write_package_migration("Post", "a.php")?;
        project.write_published_migration("Post", "b.php")?;

        let tracker = tracker(&project);
        tracker.track("Post", "1.0.0")?;
        let report = tracker.compare_with_tracked("Post")?;

        assert_eq!(report.status, TrackingStatus::Tracked);
        assert_eq!(report.tracked_version.as_deref(), Some("1.0.0"));
        assert!(!report.has_changes());
        Ok(())
    }

    #[test]
    fn test_drift_after_package_update() -> Result<()> {
        let project = TestProject::new()?;
        project.write_package_migration("Tag", "a.php")?;
        project.write_package_migration("Tag", "b.php")?;

        let tracker = tracker(&project);
        tracker.track("Tag", "1.0.0")?;

        std::fs::remove_file(project.ctx.layout.migration_dirs("Tag")[0].join("a.php"))?;
        project.write_package_migration("Tag", "c.php")?;

        let report = tracker.compare_with_tracked("Tag")?;
        assert_eq!(report.new_migrations, vec!["c.php"]);
        assert_eq!(report.removed_migrations, vec!["a.php"]);
        assert_eq!(report.total_new(), 1);
        assert_eq!(report.total_removed(), 1);
        assert!(tracker.has_updates("Tag")?);
        assert_eq!(
            tracker.new_since_last_check("Tag")?,
            BTreeSet::from(["c.php".to_string()])
        );
        Ok(())
    }

    #[test]
    fn test_retrack_replaces_snapshot() -> Result<()> {
        let project = TestProject::new()?;
        project.write_package_migration("Tag", "a.php")?;

        let tracker = tracker(&project);
        tracker.track("Tag", "1.0.0")?;
        project.write_package_migration("Tag", "b.php")?;
        tracker.track("Tag", "1.1.0")?;

        let info = tracker.tracking_info("Tag")?.expect("tracked");
        assert_eq!(info.version, "1.1.0");
        assert_eq!(info.migrations, vec!["a.php", "b.php"]);
        assert!(!tracker.has_updates("Tag")?);
        assert_eq!(tracker.all_tracking_info()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_track_all_uses_descriptor_versions() -> Result<()> {
        let project = TestProject::new()?;
        project.write_descriptor("Post", r#"{"name": "Post", "version": "2.0.0"}"#)?;
        project.write_package_migration("Post", "a.php")?;
        project.write_package_migration("Menu", "m.php")?;

        let registry = ModuleRegistry::new(&project.ctx.layout);
        let tracker = tracker(&project);
        let names = vec!["Post".to_string(), "Menu".to_string()];
        let tracked = tracker.track_all(&registry, &names)?;

        assert_eq!(tracked, vec![("Post".to_string(), "2.0.0".to_string())]);
        assert!(tracker.tracking_info("Menu")?.is_none());
        assert_eq!(
            tracker.tracking_info("Post")?.map(|s| s.migrations),
            Some(vec!["a.php".to_string()])
        );
        Ok(())
    }

    #[test]
    fn test_pending_matches_both_conventions() -> Result<()> {
        let project = TestProject::new()?;
        project.write_package_migration("Post", "2024_a.php")?;
        project.write_package_migration("Post", "2024_b.php")?;
        project.write_package_migration("Post", "2024_c.php")?;

        let applied = vec!["2024_a".to_string(), "2024_b.php".to_string()];
        let pending = tracker(&project).pending_migrations("Post", &applied)?;
        assert_eq!(pending, BTreeSet::from(["2024_c.php".to_string()]));
        Ok(())
    }

    #[test]
    fn test_pending_fails_open() -> Result<()> {
        let project = TestProject::new()?;
        project.write_package_migration("Post", "2024_a.php")?;
        project.write_package_migration("Post", "2024_b.php")?;

        let missing = FileAppliedMigrations::new(project.temp_dir.path().join("no-such-file"));
        let pending = tracker(&project).pending_migrations("Post", &missing)?;
        assert_eq!(pending.len(), 2);
        assert!(pending.contains("2024_a.php"));
        Ok(())
    }

    #[test]
    fn test_storage_failure_propagates() -> Result<()> {
        let project = TestProject::new()?;
        let blocker = project.temp_dir.path().join("blocked");
        std::fs::write(&blocker, "file")?;

        let ledger = FileLedger::new(blocker.join("ledger.bin"));
        let tracker = DriftTracker::with_ledger(&project.ctx.layout, ledger, "php");
        assert!(tracker.track("Post", "1.0.0").is_err());
        assert!(tracker.tracking_info("Post").is_err());
        Ok(())
    }
}
