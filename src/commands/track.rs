use crate::ModmanContext;
use crate::modules::naming::count_noun;
use crate::output;
use crate::tracking::DriftTracker;
use anyhow::Result;
use colored::Colorize;

/// Records the current migration set of one module, or of every configured
/// module.
///
/// Already tracked modules are left alone unless `force` is set.
///
/// # Errors
///
/// Returns an error if a named module has no version or the ledger cannot be
/// written.
pub fn execute(ctx: &ModmanContext, module: Option<&str>, force: bool) -> Result<()> {
    let tracker = ctx.tracker();

    if let Some(name) = module {
        return track_one(ctx, &tracker, &ctx.resolve_module_name(name), force);
    }

    if force {
        let tracked = tracker.track_all(&ctx.registry(), &ctx.config.modules.names)?;
        for (name, version) in &tracked {
            let count = tracker
                .tracking_info(name)?
                .map_or(0, |snapshot| snapshot.migrations.len());
            super::print_detail(
                &format!("{name} v{version}"),
                &format!("tracked ({})", count_noun(count, "migration")),
            );
        }
        super::print_success(&format!("Tracked {}", count_noun(tracked.len(), "module")));
        return Ok(());
    }

    for name in &ctx.config.modules.names {
        let Some(version) = ctx.registry().version(name) else {
            super::print_detail(name, &"no version, skipped".dimmed().to_string());
            continue;
        };
        if let Some(existing) = tracker.tracking_info(name)? {
            super::print_detail(
                &format!("{name} v{}", existing.version),
                &"already tracked".dimmed().to_string(),
            );
            continue;
        }
        let snapshot = tracker.track(name, &version)?;
        super::print_detail(
            &format!("{name} v{version}"),
            &format!("tracked ({})", count_noun(snapshot.migrations.len(), "migration"))
                .green()
                .to_string(),
        );
    }

    println!();
    super::print_info("Run this after every package update to detect new migrations");
    Ok(())
}

fn track_one(ctx: &ModmanContext, tracker: &DriftTracker<'_>, name: &str, force: bool) -> Result<()> {
    let Some(version) = ctx.registry().version(name) else {
        anyhow::bail!("Module '{name}' not found");
    };

    if !force && let Some(existing) = tracker.tracking_info(name)? {
        super::print_warning(&format!(
            "Module '{name}' is already tracked (version {}). Use --force to re-track.",
            existing.version
        ));
        return Ok(());
    }

    let snapshot = tracker.track(name, &version)?;
    super::print_success(&format!("Tracked {name} v{version}"));
    super::print_detail("Migrations tracked", &snapshot.migrations.len().to_string());
    for migration in &snapshot.migrations {
        output::verbose(&format!("    → {migration}"));
    }
    Ok(())
}
