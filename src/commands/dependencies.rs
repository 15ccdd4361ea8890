use crate::ModmanContext;
use crate::modules::DependencyStatus;
use crate::modules::version::UNKNOWN_VERSION;
use anyhow::Result;
use colored::Colorize;

/// Checks that every declared dependency is installed.
///
/// # Errors
///
/// Returns an error if a named module has no descriptor or any checked
/// module has a missing dependency.
pub fn execute(ctx: &ModmanContext, module: Option<&str>) -> Result<()> {
    match module {
        Some(name) => show_module(ctx, &ctx.resolve_module_name(name)),
        None => show_all(ctx),
    }
}

fn show_all(ctx: &ModmanContext) -> Result<()> {
    let registry = ctx.registry();
    let mut all_satisfied = true;

    for summary in registry.modules_by_priority(&ctx.config.modules.names) {
        let label = format!("{} v{}", summary.name, summary.version);
        if summary.requires.is_empty() {
            super::print_detail(&label, &"no dependencies".dimmed().to_string());
            continue;
        }

        let status = registry.dependencies_satisfied(&summary.name);
        if status.all_satisfied {
            super::print_detail(&label, &"✓ all dependencies satisfied".green().to_string());
        } else {
            all_satisfied = false;
            super::print_detail(&label, &"✗ missing dependencies".red().to_string());
        }
        print_tree(&status);
    }

    println!();
    if !all_satisfied {
        anyhow::bail!("Some modules have unsatisfied dependencies");
    }
    super::print_success("All module dependencies are satisfied.");
    Ok(())
}

fn print_tree(status: &DependencyStatus) {
    let total = status.satisfied.len() + status.missing.len();
    let entries = status.satisfied.iter().chain(&status.missing);
    for (i, dep) in entries.enumerate() {
        let branch = if i + 1 == total { "└─" } else { "├─" };
        if dep.satisfied {
            let version = dep.version.as_deref().unwrap_or(UNKNOWN_VERSION);
            println!("    {branch} {} v{version} {}", dep.name, "✓".green());
        } else {
            println!("    {branch} {} {}", dep.name, "✗ MISSING".red());
        }
    }
}

fn show_module(ctx: &ModmanContext, name: &str) -> Result<()> {
    let registry = ctx.registry();
    let Some(data) = registry.module_data(name) else {
        anyhow::bail!("Module '{name}' not found");
    };

    super::print_detail("Name", &data.name);
    super::print_detail("Version", data.version.as_deref().unwrap_or(UNKNOWN_VERSION));
    super::print_detail("Description", data.description.as_deref().unwrap_or("N/A"));
    super::print_detail("Priority", &data.priority.to_string());
    println!();

    if data.requires.is_empty() {
        super::print_info("This module has no dependencies.");
        return Ok(());
    }

    let status = registry.dependencies_satisfied(name);
    println!("  {}", "Dependencies".bright_blue().bold());
    print_tree(&status);
    println!();

    if !status.all_satisfied {
        let missing: Vec<&str> = status.missing.iter().map(|d| d.name.as_str()).collect();
        anyhow::bail!("Missing dependencies for {name}: {}", missing.join(", "));
    }
    super::print_success("All dependencies are satisfied.");
    Ok(())
}
