use crate::ModmanContext;
use crate::modules::version::CHANGELOG_FILE;
use anyhow::Result;
use colored::Colorize;

/// Lists installed module versions by priority, highest first.
///
/// With `changelog`, prints the module's changelog after the listing.
///
/// # Errors
///
/// Returns an error if the module directories cannot be listed or the
/// requested changelog does not exist.
pub fn execute(ctx: &ModmanContext, changelog: Option<&str>) -> Result<()> {
    let registry = ctx.registry();

    if let Some(module) = changelog {
        let name = ctx.resolve_module_name(module);
        let Some(text) = registry.changelog(&name) else {
            anyhow::bail!("No {CHANGELOG_FILE} found for module '{name}'");
        };
        println!("{text}");
        return Ok(());
    }

    let names = ctx.layout.all_modules()?;
    if names.is_empty() {
        super::print_warning("No modules found.");
        return Ok(());
    }

    let summaries = registry.modules_by_priority(&names);
    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for summary in &summaries {
        println!(
            "{}  {:<10}  {:>4}  {}",
            format!("{:<width$}", summary.name).bold(),
            summary.version,
            summary.priority,
            summary.description.dimmed()
        );
    }
    Ok(())
}
