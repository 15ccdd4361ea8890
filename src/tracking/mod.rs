//! Snapshot ledger and drift detection for module migrations.

pub mod ledger;
pub mod tracker;

pub use ledger::{FileLedger, TrackedSnapshot};
pub use tracker::{DriftReport, DriftTracker, TrackingStatus};
