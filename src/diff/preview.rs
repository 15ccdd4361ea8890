//! Positional line preview of two versions of a file.
//!
//! Best-effort display aid: the first `max_lines` line positions are compared
//! pairwise and differing pairs are returned, truncated for display. It does
//! not align inserted or deleted lines; use the unified diff for that.

use super::binary::is_binary_file;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// One differing line position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinePreview {
    /// 1-based line number
    pub line: usize,
    pub left: String,
    pub right: String,
}

/// Outcome of a preview request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// At least one side is binary; no lines are compared
    Binary,
    /// Differing positions within the window, possibly empty
    Lines(Vec<LinePreview>),
}

/// Compares the first `max_lines` lines of `left` and `right` by position.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn line_preview(
    left: &Path,
    right: &Path,
    max_lines: usize,
    max_width: usize,
) -> Result<Preview> {
    if is_binary_file(left)? || is_binary_file(right)? {
        return Ok(Preview::Binary);
    }

    let left_text = read_lossy(left)?;
    let right_text = read_lossy(right)?;
    Ok(Preview::Lines(compare_lines(
        &left_text,
        &right_text,
        max_lines,
        max_width,
    )))
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Differing line pairs among the first `max_lines` positions of two texts.
/// A position past the end of one text compares as an empty line.
#[must_use]
pub fn compare_lines(
    left: &str,
    right: &str,
    max_lines: usize,
    max_width: usize,
) -> Vec<LinePreview> {
    let left_lines: Vec<&str> = left.split('\n').collect();
    let right_lines: Vec<&str> = right.split('\n').collect();
    let window = left_lines.len().max(right_lines.len()).min(max_lines);

    (0..window)
        .filter_map(|i| {
            let l = left_lines.get(i).copied().unwrap_or_default();
            let r = right_lines.get(i).copied().unwrap_or_default();
            (l != r).then(|| LinePreview {
                line: i + 1,
                left: truncate(l, max_width),
                right: truncate(r, max_width),
            })
        })
        .collect()
}

fn truncate(line: &str, max_width: usize) -> String {
    line.chars().take(max_width).collect()
}
