use crate::ModmanContext;
use crate::modules::naming::{count_noun, migrations_tag};
use crate::modules::version::UNKNOWN_VERSION;
use crate::tracking::{DriftReport, TrackingStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::{Color, Colorize};

/// Reports migration drift and version changes since modules were tracked.
///
/// # Errors
///
/// Returns an error if a named module was never tracked or the ledger cannot
/// be read.
pub fn execute(ctx: &ModmanContext, module: Option<&str>) -> Result<()> {
    match module {
        Some(name) => detect_one(ctx, &ctx.resolve_module_name(name)),
        None => detect_all(ctx),
    }
}

/// Whether the descriptor version differs from the tracked one.
fn version_changed(report: &DriftReport, current: &str) -> bool {
    report
        .tracked_version
        .as_deref()
        .is_some_and(|tracked| tracked != current)
}

/// One-line summary pieces for a drifted module, each with its display colour.
fn summary_parts(report: &DriftReport, current: &str) -> Vec<(String, Color)> {
    let mut parts = Vec::new();
    if version_changed(report, current) {
        let tracked = report.tracked_version.as_deref().unwrap_or(UNKNOWN_VERSION);
        parts.push((format!("version {tracked} → {current}"), Color::Yellow));
    }
    if report.total_new() > 0 {
        parts.push((
            format!("{} new", count_noun(report.total_new(), "migration")),
            Color::BrightBlue,
        ));
    }
    if report.total_removed() > 0 {
        parts.push((
            format!("{} removed", count_noun(report.total_removed(), "migration")),
            Color::Red,
        ));
    }
    parts
}

fn detect_all(ctx: &ModmanContext) -> Result<()> {
    let tracker = ctx.tracker();
    let registry = ctx.registry();
    let mut outdated = Vec::new();

    for name in &ctx.config.modules.names {
        let report = tracker.compare_with_tracked(name)?;
        let version = registry
            .version(name)
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

        if report.status == TrackingStatus::NotTracked {
            super::print_warning(&format!("{name} v{version} - not yet tracked"));
            super::print_hint(&format!("modman track {name}"));
            continue;
        }

        let changed = version_changed(&report, &version);
        if !changed && !report.has_changes() {
            super::print_detail(&format!("{name} v{version}"), &"✓ no updates".dimmed().to_string());
            continue;
        }

        let summary: Vec<String> = summary_parts(&report, &version)
            .into_iter()
            .map(|(text, color)| text.color(color).to_string())
            .collect();
        super::print_detail(name, &summary.join(", "));
        for migration in &report.new_migrations {
            super::print_item(&"→".dimmed(), migration);
        }
        for migration in &report.removed_migrations {
            super::print_item(&"✗".red(), migration);
        }
        outdated.push(name.clone());
    }

    println!();
    if outdated.is_empty() {
        super::print_success("All modules are up to date!");
        return Ok(());
    }

    super::print_info("To update the tracking state:");
    super::print_hint("modman track --force");
    super::print_info("To publish new migrations:");
    for name in &outdated {
        super::print_hint(&format!("php artisan vendor:publish --tag={}", migrations_tag(name)));
    }
    Ok(())
}

fn detect_one(ctx: &ModmanContext, name: &str) -> Result<()> {
    let report = ctx.tracker().compare_with_tracked(name)?;
    if report.status == TrackingStatus::NotTracked {
        anyhow::bail!("Module '{name}' is not yet tracked. Run `modman track {name}` first");
    }

    let current = ctx
        .registry()
        .version(name)
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string());
    let tracked = report.tracked_version.as_deref().unwrap_or(UNKNOWN_VERSION);

    super::print_detail("Module", name);
    super::print_detail("Current version", &current);
    super::print_detail("Tracked version", tracked);
    if let Some(checked) = report.last_checked {
        super::print_detail("Last checked", &describe_time(checked));
    }
    println!();

    let changed = version_changed(&report, &current);
    if changed {
        super::print_warning(&format!("Version changed: {tracked} → {current}"));
    }
    if report.total_new() > 0 {
        super::print_info(&format!("New migrations ({}):", report.total_new()));
        for migration in &report.new_migrations {
            super::print_item(&"+".green(), migration);
        }
    }
    if report.total_removed() > 0 {
        super::print_warning(&format!("Removed migrations ({}):", report.total_removed()));
        for migration in &report.removed_migrations {
            super::print_item(&"-".red(), migration);
        }
    }

    if !changed && !report.has_changes() {
        super::print_success("No updates detected for this module.");
        return Ok(());
    }

    println!();
    super::print_info("Next steps:");
    if report.total_new() > 0 {
        super::print_hint(&format!("php artisan vendor:publish --tag={}", migrations_tag(name)));
    }
    super::print_hint(&format!("modman track {name} --force"));
    Ok(())
}

/// `2026-03-01 12:00:00 UTC (3h 12m ago)`.
fn describe_time(at: DateTime<Utc>) -> String {
    let elapsed = (Utc::now() - at).to_std().unwrap_or_default();
    let rounded = std::time::Duration::from_secs(elapsed.as_secs() / 60 * 60);
    if rounded.is_zero() {
        format!("{} (just now)", at.format("%Y-%m-%d %H:%M:%S UTC"))
    } else {
        format!(
            "{} ({} ago)",
            at.format("%Y-%m-%d %H:%M:%S UTC"),
            humantime::format_duration(rounded)
        )
    }
}
