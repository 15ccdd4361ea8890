//! Comparison of a vendored module tree against its published copy.
//!
//! - [`tree`]: presence and content-hash partitions (the authoritative result)
//! - [`preview`]: positional line preview for modified files
//! - [`unified`]: full unified diff for human inspection
//! - [`binary`]: binary content detection shared by the display helpers

/// Binary file detection utilities
pub mod binary;
/// Positional line preview
pub mod preview;
/// Directory tree comparison
pub mod tree;
/// Unified diff generation for text files
pub mod unified;

pub use binary::is_binary_file;
pub use preview::{LinePreview, Preview, compare_lines, line_preview};
pub use tree::{DiffOptions, FileTreeDiff, diff_trees, group_by_directory};
pub use unified::{UnifiedDiffConfig, diff_module_file, generate_unified_diff};

use crate::config::DiffAlgorithm;
use similar::Algorithm;

/// Maps the configured algorithm onto `similar`'s.
#[must_use]
pub const fn config_to_algorithm(algo: DiffAlgorithm) -> Algorithm {
    match algo {
        DiffAlgorithm::Myers => Algorithm::Myers,
        DiffAlgorithm::Patience => Algorithm::Patience,
    }
}
