//! Unified diff rendering for a single file present in both module copies.

use super::binary::is_binary_file;
use anyhow::{Context, Result};
use colored::Colorize;
use similar::{Algorithm, ChangeTag, TextDiff};
use std::io::Write;
use std::path::Path;
use tracing::{Level, debug, span};

/// Rendering options for unified diffs.
#[derive(Debug, Clone, Copy)]
pub struct UnifiedDiffConfig {
    /// Unchanged lines shown around each change
    pub context_lines: usize,
    pub algorithm: Algorithm,
    pub colorize: bool,
}

impl Default for UnifiedDiffConfig {
    fn default() -> Self {
        Self {
            context_lines: 3,
            algorithm: Algorithm::Myers,
            colorize: false,
        }
    }
}

/// Writes a unified diff of two texts with `---`/`+++` headers labelled
/// `old_label` and `new_label`. Identical texts produce headers only.
///
/// Returns the number of inserted plus deleted lines.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn generate_unified_diff(
    old_content: &str,
    new_content: &str,
    old_label: &str,
    new_label: &str,
    config: &UnifiedDiffConfig,
    writer: &mut dyn Write,
) -> Result<usize> {
    let span = span!(Level::DEBUG, "unified_diff", file = new_label, algorithm = ?config.algorithm);
    let _guard = span.enter();

    let diff = TextDiff::configure()
        .algorithm(config.algorithm)
        .diff_lines(old_content, new_content);

    let old_header = format!("--- {old_label}");
    let new_header = format!("+++ {new_label}");
    if config.colorize {
        writeln!(writer, "{}", old_header.red())?;
        writeln!(writer, "{}", new_header.green())?;
    } else {
        writeln!(writer, "{old_header}")?;
        writeln!(writer, "{new_header}")?;
    }

    let mut changed = 0;
    for hunk in diff
        .unified_diff()
        .context_radius(config.context_lines)
        .iter_hunks()
    {
        let header = hunk.header().to_string();
        if config.colorize {
            writeln!(writer, "{}", header.cyan())?;
        } else {
            writeln!(writer, "{header}")?;
        }

        for change in hunk.iter_changes() {
            let line = match change.tag() {
                ChangeTag::Delete => {
                    changed += 1;
                    let line = format!("-{change}");
                    if config.colorize { line.red().to_string() } else { line }
                }
                ChangeTag::Insert => {
                    changed += 1;
                    let line = format!("+{change}");
                    if config.colorize { line.green().to_string() } else { line }
                }
                ChangeTag::Equal => format!(" {change}"),
            };

            write!(writer, "{line}")?;
            if change.missing_newline() {
                writeln!(writer)?;
            }
        }
    }

    debug!(changed, "Unified diff written");
    Ok(changed)
}

/// Diffs the package and published copies of `relative`. Binary files get a
/// one-line notice instead of a diff.
///
/// # Errors
///
/// Returns an error if either file cannot be read or writing fails.
pub fn diff_module_file(
    package_root: &Path,
    published_root: &Path,
    relative: &str,
    config: &UnifiedDiffConfig,
    writer: &mut dyn Write,
) -> Result<usize> {
    let package_file = package_root.join(relative);
    let published_file = published_root.join(relative);

    if is_binary_file(&package_file)? || is_binary_file(&published_file)? {
        writeln!(writer, "Binary files package/{relative} and published/{relative} differ")?;
        return Ok(0);
    }

    let old = std::fs::read_to_string(&package_file)
        .with_context(|| format!("Failed to read {}", package_file.display()))?;
    let new = std::fs::read_to_string(&published_file)
        .with_context(|| format!("Failed to read {}", published_file.display()))?;

    generate_unified_diff(
        &old,
        &new,
        &format!("package/{relative}"),
        &format!("published/{relative}"),
        config,
        writer,
    )
}
