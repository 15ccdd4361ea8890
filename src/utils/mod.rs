//! Utility functions and helpers.
//!
//! - [`hash`]: xxHash3 content digests for files
//! - [`paths`]: path resolution, slash-normalised relative paths, atomic writes
//! - [`serialization`]: bincode encoding for on-disk state

/// Content hashing (xxHash3-128)
pub mod hash;
/// Path manipulation and resolution utilities
pub mod paths;
/// Binary serialization utilities
pub mod serialization;

/// Whether a walk entry below the walk root is hidden (name starts with `.`).
/// The root itself is never hidden, so temp and state directories can be
/// walked.
#[must_use]
pub fn is_hidden_entry(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Determines if a relative path should be ignored based on glob patterns.
///
/// A pattern matches either the whole slash-separated path or any single
/// component of it, so `.DS_Store` excludes the file at any depth and
/// `vendor/**` excludes a subtree.
#[must_use]
pub fn should_ignore(relative: &str, patterns: &[glob::Pattern]) -> bool {
    patterns.iter().any(|pattern| {
        pattern.matches(relative) || relative.split('/').any(|part| pattern.matches(part))
    })
}

/// Compiles configured ignore patterns, skipping ones that are not valid globs.
#[must_use]
pub fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "Ignoring invalid ignore pattern");
                None
            }
        })
        .collect()
}
