//! Persistent drift ledger.
//!
//! One [`TrackedSnapshot`] per module, stored together in a single versioned
//! bincode file under the state directory. The store is created lazily: every
//! read and write first runs [`FileLedger::ensure_store`], which is a no-op
//! once the file exists.
//!
//! Writes are read-modify-write without locking. Two processes tracking at the
//! same time resolve as last writer wins; each write replaces the file
//! atomically, so readers never see a torn ledger.

use crate::utils::paths::write_atomic;
use crate::utils::serialization;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recorded state of one module at the time it was tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedSnapshot {
    pub module: String,
    pub version: String,
    /// Migration file names, sorted; membership is what matters
    pub migrations: Vec<String>,
    pub last_checked: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrackedSnapshot {
    /// Builds a snapshot stamped with `now`.
    #[must_use]
    pub fn new(
        module: &str,
        version: &str,
        migrations: &BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            module: module.to_string(),
            version: version.to_string(),
            migrations: migrations.iter().cloned().collect(),
            last_checked: now,
            updated_at: now,
        }
    }

    /// The recorded migrations as a set.
    #[must_use]
    pub fn migration_set(&self) -> BTreeSet<String> {
        self.migrations.iter().cloned().collect()
    }
}

/// On-disk layout of the ledger file.
#[derive(Debug, Serialize, Deserialize)]
struct LedgerFile {
    /// Format version for future compatibility
    version: u32,
    /// Rows keyed by module name
    rows: BTreeMap<String, TrackedSnapshot>,
}

impl LedgerFile {
    /// Current ledger format version
    const CURRENT_VERSION: u32 = 1;

    const fn empty() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            rows: BTreeMap::new(),
        }
    }
}

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct FileLedger {
    /// Location of the ledger file
    path: PathBuf,
}

impl FileLedger {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the state directory and an empty ledger if either is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the file cannot be created.
    pub fn ensure_store(&self) -> Result<()> {
        if self.path.is_file() {
            return Ok(());
        }

        debug!(path = %self.path.display(), "Creating empty drift ledger");
        self.write(&LedgerFile::empty())
    }

    /// Snapshot for one module, or `None` if it was never tracked.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be created, read or decoded.
    pub fn get(&self, module: &str) -> Result<Option<TrackedSnapshot>> {
        let mut ledger = self.read()?;
        Ok(ledger.rows.remove(module))
    }

    /// Every stored snapshot keyed by module.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be created, read or decoded.
    pub fn all(&self) -> Result<BTreeMap<String, TrackedSnapshot>> {
        Ok(self.read()?.rows)
    }

    /// Inserts the snapshot, replacing any existing row for the same module.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read or written.
    pub fn upsert(&self, snapshot: TrackedSnapshot) -> Result<()> {
        let mut ledger = self.read()?;
        ledger.rows.insert(snapshot.module.clone(), snapshot);
        self.write(&ledger)
    }

    fn read(&self) -> Result<LedgerFile> {
        self.ensure_store()?;

        let data = std::fs::read(&self.path)
            .with_context(|| format!("Failed to read drift ledger: {}", self.path.display()))?;
        let ledger: LedgerFile = serialization::deserialize(&data)
            .with_context(|| format!("Corrupt drift ledger: {}", self.path.display()))?;

        if ledger.version != LedgerFile::CURRENT_VERSION {
            anyhow::bail!(
                "Unsupported drift ledger version {} in {}",
                ledger.version,
                self.path.display()
            );
        }
        Ok(ledger)
    }

    fn write(&self, ledger: &LedgerFile) -> Result<()> {
        let data = serialization::serialize(ledger).context("Failed to serialize drift ledger")?;
        write_atomic(&self.path, &data)
            .with_context(|| format!("Failed to write drift ledger: {}", self.path.display()))
    }
}
