//! Migration files on disk and the external record of which ones have run.

pub mod applied;
pub mod enumerator;

pub use applied::{AppliedMigrations, AppliedSet, FileAppliedMigrations};
pub use enumerator::MigrationEnumerator;
