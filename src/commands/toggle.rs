use crate::ModmanContext;
use crate::modules::Toggle;
use anyhow::Result;

/// Enables a module in the activation file.
///
/// # Errors
///
/// Returns an error if the status file is missing, the module is not listed
/// in it, or the file cannot be saved.
pub fn enable(ctx: &ModmanContext, module: &str) -> Result<()> {
    set(ctx, module, true)
}

/// Disables a module in the activation file.
///
/// # Errors
///
/// Returns an error if the status file is missing, the module is not listed
/// in it, or the file cannot be saved.
pub fn disable(ctx: &ModmanContext, module: &str) -> Result<()> {
    set(ctx, module, false)
}

fn set(ctx: &ModmanContext, module: &str, enabled: bool) -> Result<()> {
    let mut statuses = ctx.statuses()?;
    let (name, outcome) = if enabled {
        statuses.enable(module)?
    } else {
        statuses.disable(module)?
    };
    let state = if enabled { "enabled" } else { "disabled" };

    match outcome {
        Toggle::Unchanged => {
            super::print_info(&format!("Module {name} is already {state}."));
        }
        Toggle::Changed => {
            statuses.save()?;
            super::print_success(&format!("Module {name} {state} successfully."));
        }
    }
    Ok(())
}
