use crate::ModmanContext;
use crate::diff::{
    FileTreeDiff, Preview, UnifiedDiffConfig, config_to_algorithm, diff_module_file, diff_trees,
    group_by_directory, line_preview,
};
use anyhow::Result;
use colored::{ColoredString, Colorize};
use std::collections::BTreeSet;
use std::io::IsTerminal;
use std::path::Path;

/// What to show for each modified file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffDisplay {
    /// Positional preview of the first lines
    pub detailed: bool,
    /// Full unified diff
    pub unified: bool,
}

/// Compares the package copy of a module with its published copy.
///
/// # Errors
///
/// Returns an error if the module is not in the package or a tree cannot be
/// read.
pub fn execute(ctx: &ModmanContext, module: &str, display: DiffDisplay) -> Result<()> {
    let name = ctx.resolve_module_name(module);
    let location = ctx.layout.locate(&name);

    if !location.in_package {
        anyhow::bail!("Module '{name}' not found in package");
    }
    if !location.published {
        super::print_warning(&format!("Module '{name}' has not been published yet."));
        super::print_info("It runs from the package copy and updates with the package.");
        return Ok(());
    }

    let package_root = ctx.layout.package_module_dir(&name);
    let published_root = ctx.layout.published_module_dir(&name);
    let diff = diff_trees(&package_root, &published_root, &ctx.diff_options())?;

    println!("{} {}", "Comparing module:".bright_blue().bold(), name);
    println!();

    print_group(
        "New files in package (not in your version):",
        &diff.only_in_left,
        &"+".green(),
    );
    print_group("Files only in your version:", &diff.only_in_right, &"-".red());

    if !diff.modified.is_empty() {
        super::print_warning("Modified files:");
        for file in &diff.modified {
            super::print_item(&"M".yellow(), file);
            if display.detailed {
                show_preview(ctx, &package_root.join(file), &published_root.join(file))?;
            }
            if display.unified {
                show_unified(ctx, &package_root, &published_root, file)?;
            }
        }
        println!();
    }

    summarize(&diff);
    Ok(())
}

fn print_group(title: &str, files: &BTreeSet<String>, marker: &ColoredString) {
    if files.is_empty() {
        return;
    }
    super::print_warning(title);
    for (dir, paths) in group_by_directory(files) {
        println!("  {}", format!("{dir}/").dimmed());
        for path in paths {
            super::print_item(marker, &path);
        }
    }
    println!();
}

fn show_preview(ctx: &ModmanContext, package: &Path, published: &Path) -> Result<()> {
    let lines = ctx.config.diff.preview_lines;
    let width = ctx.config.diff.preview_width;

    println!("      {}", format!("first {lines} lines").dimmed());
    match line_preview(package, published, lines, width)? {
        Preview::Binary => println!("      {}", "(binary file)".dimmed()),
        Preview::Lines(diffs) if diffs.is_empty() => {
            println!("      {}", "(differences in whitespace or later in file)".dimmed());
        }
        Preview::Lines(diffs) => {
            for diff in diffs {
                if !diff.left.is_empty() {
                    println!("      {} {}", "-".red(), diff.left.red());
                }
                if !diff.right.is_empty() {
                    println!("      {} {}", "+".green(), diff.right.green());
                }
            }
        }
    }
    Ok(())
}

fn show_unified(
    ctx: &ModmanContext,
    package_root: &Path,
    published_root: &Path,
    file: &str,
) -> Result<()> {
    let config = UnifiedDiffConfig {
        context_lines: 3,
        algorithm: config_to_algorithm(ctx.config.diff.algorithm),
        colorize: std::io::stdout().is_terminal(),
    };
    let mut stdout = std::io::stdout().lock();
    diff_module_file(package_root, published_root, file, &config, &mut stdout)?;
    Ok(())
}

fn summarize(diff: &FileTreeDiff) {
    if !diff.has_changes() {
        super::print_success("No differences found. Your module matches the package version.");
        return;
    }

    super::print_info(&format!(
        "{} new, {} only yours, {} modified ({} files in common)",
        diff.only_in_left.len(),
        diff.only_in_right.len(),
        diff.modified.len(),
        diff.common.len()
    ));
    println!("  Review the changes above and decide whether to:");
    println!("  - merge new features from the package by hand");
    println!("  - keep your customisations as they are");
    println!("  - re-publish and re-apply your customisations");
}
