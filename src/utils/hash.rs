use anyhow::{Context, Result};
use memmap2::MmapOptions;
use rayon::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_128;

/// Files at or above this size are hashed through a memory map.
const MMAP_THRESHOLD: u64 = 1_048_576;

/// Hashes a byte slice into a 32-character hex xxHash3-128 digest.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> String {
    let hash = xxh3_128(data);
    format!("{hash:032x}")
}

/// Hashes the full contents of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, inspected or mapped.
pub fn hash_file(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {} for hashing", path.display()))?;
    let metadata = file.metadata()?;

    if metadata.len() == 0 {
        return Ok(hash_bytes(b""));
    }

    if metadata.len() < MMAP_THRESHOLD {
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read {} for hashing", path.display()))?;
        Ok(hash_bytes(&content))
    } else {
        // SAFETY: the map is read-only and dropped before this function returns.
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        Ok(hash_bytes(&mmap))
    }
}

/// Hashes many files on the rayon pool, preserving input order.
///
/// # Errors
///
/// Returns the first hashing error encountered.
pub fn hash_files_parallel(paths: &[PathBuf]) -> Result<Vec<String>> {
    paths.par_iter().map(|path| hash_file(path)).collect()
}
