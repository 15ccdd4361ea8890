use crate::ModmanContext;
use crate::layout::{ModuleLocation, ModuleSource};
use crate::modules::naming::migrations_tag;
use anyhow::Result;
use colored::{Color, Colorize};

/// Shows where modules live and who owns their updates.
///
/// # Errors
///
/// Returns an error if a named module exists in neither location or a module
/// root cannot be listed.
pub fn execute(ctx: &ModmanContext, module: Option<&str>) -> Result<()> {
    match module {
        Some(name) => show_module(ctx, &ctx.resolve_module_name(name)),
        None => show_all(ctx),
    }
}

fn show_all(ctx: &ModmanContext) -> Result<()> {
    let modules = ctx.layout.all_modules()?;
    if modules.is_empty() {
        super::print_warning("No modules found.");
        return Ok(());
    }

    // A malformed activation file only blanks the Enabled column.
    let statuses = ctx.statuses().ok();

    let width = modules.iter().map(String::len).max().unwrap_or(0).max(6);
    println!(
        "{}",
        format!(
            "{:<width$}  {:<20}  {:<10}  {:<7}  {}",
            "Module", "Location", "Customized", "Enabled", "Update Strategy"
        )
        .bold()
    );

    for name in &modules {
        let (source, customized, strategy, color) = columns(&ctx.layout.locate(name));
        let enabled = match statuses.as_ref().and_then(|s| s.is_enabled(name)) {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        println!(
            "{name:<width$}  {}  {}  {enabled:<7}  {}",
            format!("{source:<20}").color(color),
            format!("{customized:<10}").color(color),
            strategy.color(color)
        );
    }

    println!();
    super::print_info("Run `modman diff <module>` to compare a published module with the package");
    Ok(())
}

fn columns(location: &ModuleLocation) -> (&'static str, &'static str, &'static str, Color) {
    match location.source() {
        Some(source @ ModuleSource::UserOwned) => {
            (source.label(), "Yes", source.update_strategy(), Color::Yellow)
        }
        Some(source @ ModuleSource::Vendored) => {
            (source.label(), "No", source.update_strategy(), Color::Green)
        }
        None => ("unknown", "?", "unknown", Color::Red),
    }
}

fn show_module(ctx: &ModmanContext, name: &str) -> Result<()> {
    let location = ctx.layout.locate(name);
    let Some(source) = location.source() else {
        anyhow::bail!("Module '{name}' not found");
    };

    println!("{} {}", "Module:".bright_blue().bold(), name);
    super::print_detail("Location", source.label());
    super::print_detail(
        "Customized",
        if source == ModuleSource::UserOwned { "Yes" } else { "No" },
    );
    super::print_detail("Update Strategy", source.update_strategy());
    if let Some(version) = ctx.registry().version(name) {
        super::print_detail("Version", &version);
    }
    if let Ok(statuses) = ctx.statuses()
        && let Some(enabled) = statuses.is_enabled(name)
    {
        super::print_detail("Enabled", if enabled { "yes" } else { "no" });
    }
    super::print_detail("Migrations tag", &migrations_tag(name));
    println!();

    if location.is_diffable() {
        super::print_warning("Package version also exists in the vendor directory");
        super::print_hint(&format!("modman diff {name}"));
    } else if source == ModuleSource::Vendored {
        super::print_info("Publish the module to customise it");
    }
    Ok(())
}
