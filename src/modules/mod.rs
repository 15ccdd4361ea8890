//! Module metadata: descriptors, versions, dependencies, naming and
//! activation flags.
//!
//! [`ModuleRegistry`] is the read-only entry point for everything derived
//! from `module.json`. [`ModuleStatuses`] owns the mutable activation file.

pub mod dependency;
pub mod descriptor;
pub mod naming;
pub mod statuses;
pub mod version;

pub use dependency::{DependencyEntry, DependencyStatus};
pub use descriptor::{ModuleDescriptor, ModuleRegistry};
pub use statuses::{ModuleStatuses, Toggle};
pub use version::{ModuleSummary, compare_versions};
