use crate::ModmanContext;
use crate::output;
use anyhow::Result;
use colored::Colorize;

/// Every key `modman config` understands, grouped by section.
const KEYS: &[(&str, &[&str])] = &[
    (
        "core",
        &[
            "package_path",
            "published_path",
            "state_dir",
            "status_file",
            "applied_migrations",
        ],
    ),
    ("modules", &["names", "descriptor_file", "migrations_dir"]),
    ("migrations", &["extension"]),
    (
        "diff",
        &["ignore_patterns", "preview_lines", "preview_width", "algorithm"],
    ),
];

/// Gets, sets, unsets or lists configuration values.
///
/// # Errors
///
/// Returns an error if the key is unknown, the value is invalid, or the
/// configuration cannot be saved.
pub fn execute(
    ctx: &mut ModmanContext,
    key: Option<&str>,
    value: Option<String>,
    unset: bool,
    list: bool,
) -> Result<()> {
    let Some(key) = key.filter(|_| !list) else {
        show_all_config(ctx);
        return Ok(());
    };

    if unset {
        ctx.config.unset(key)?;
        ctx.config.save(&ctx.config_path)?;
        ctx.reload_layout()?;
        output::success(&format!("Unset {key}"));
    } else if let Some(val) = value {
        ctx.config.set(key, val.clone())?;
        ctx.config.save(&ctx.config_path)?;
        ctx.reload_layout()?;
        output::success(&format!("Set {key} = {val}"));
    } else if let Some(val) = ctx.config.get(key) {
        println!("{val}");
    } else {
        output::warning(&format!("Configuration key '{key}' is not set"));
    }

    Ok(())
}

fn show_all_config(ctx: &ModmanContext) {
    for (i, (section, fields)) in KEYS.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", format!("[{section}]").bold());
        for field in *fields {
            if let Some(value) = ctx.config.get(&format!("{section}.{field}")) {
                println!("  {field} = {value}");
            }
        }
    }
}
