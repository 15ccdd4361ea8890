use crate::ModmanContext;
use crate::modules::naming::{count_noun, migrations_tag};
use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeSet;

/// Lists migrations that have not been applied yet.
///
/// When the applied-migrations list cannot be read every migration is shown
/// as pending.
///
/// # Errors
///
/// Returns an error if a migrations directory cannot be read.
pub fn execute(ctx: &ModmanContext, module: Option<&str>) -> Result<()> {
    let tracker = ctx.tracker();
    let applied = tracker.load_applied(&ctx.applied_migrations());

    let modules = ctx.target_modules(module);
    let mut with_pending = Vec::new();
    for name in &modules {
        let pending = tracker.pending_in(name, applied.as_ref())?;
        if pending.is_empty() {
            if module.is_some() {
                super::print_success(&format!("No new migrations for {name} module."));
            }
            continue;
        }
        show_module(name, &pending);
        with_pending.push(name.clone());
    }

    if with_pending.is_empty() {
        if module.is_none() {
            super::print_success("No new migrations found. All modules are up to date!");
        }
        return Ok(());
    }

    super::print_info("To publish migrations:");
    for name in &with_pending {
        super::print_hint(&format!("php artisan vendor:publish --tag={}", migrations_tag(name)));
    }
    Ok(())
}

fn show_module(name: &str, pending: &BTreeSet<String>) {
    super::print_detail(
        &format!("{name} module"),
        &format!("{} pending", count_noun(pending.len(), "migration"))
            .bright_blue()
            .to_string(),
    );
    for migration in pending {
        super::print_item(&"→".dimmed(), migration);
    }
    println!();
}
