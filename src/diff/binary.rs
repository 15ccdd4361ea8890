//! Binary content detection for diff display.

use anyhow::{Context, Result};
use content_inspector::{ContentType, inspect};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Number of leading bytes inspected.
const SAMPLE_SIZE: usize = 8192;

/// Whether `data` looks binary. Empty input is text.
#[must_use]
pub fn is_binary_bytes(data: &[u8]) -> bool {
    !data.is_empty() && matches!(inspect(data), ContentType::BINARY)
}

/// Inspects the head of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn is_binary_file(path: &Path) -> Result<bool> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open file for binary check: {}", path.display()))?;

    let mut buffer = [0u8; SAMPLE_SIZE];
    let n = file
        .read(&mut buffer)
        .with_context(|| format!("Failed to read file for binary check: {}", path.display()))?;

    let is_binary = is_binary_bytes(&buffer[..n]);
    debug!(path = %path.display(), is_binary, bytes_checked = n, "Binary check");
    Ok(is_binary)
}
