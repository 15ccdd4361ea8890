use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use modman::cli::{Cli, Commands};
use modman::output::{self, Verbosity};
use modman::{ModmanContext, commands};
use std::io;
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    output::set_verbosity(verbosity);
    output::init_logging(verbosity);

    if let Commands::Completion { shell } = cli.command {
        print_completions(shell, &mut Cli::command());
        return Ok(());
    }

    let mut ctx = ModmanContext::new()?;

    match cli.command {
        Commands::Status { module } => commands::status::execute(&ctx, module.as_deref())?,
        Commands::Diff {
            module,
            detailed,
            unified,
        } => {
            let display = commands::diff::DiffDisplay { detailed, unified };
            commands::diff::execute(&ctx, &module, display)?;
        }
        Commands::Track { module, force } => {
            commands::track::execute(&ctx, module.as_deref(), force)?;
        }
        Commands::DetectUpdates { module } => {
            commands::detect_updates::execute(&ctx, module.as_deref())?;
        }
        Commands::CheckMigrations { module } => {
            commands::check_migrations::execute(&ctx, module.as_deref())?;
        }
        Commands::Dependencies { module } => {
            commands::dependencies::execute(&ctx, module.as_deref())?;
        }
        Commands::Versions { changelog } => {
            commands::versions::execute(&ctx, changelog.as_deref())?;
        }
        Commands::Enable { module } => commands::toggle::enable(&ctx, &module)?,
        Commands::Disable { module } => commands::toggle::disable(&ctx, &module)?,
        Commands::Config {
            key,
            value,
            unset,
            list,
        } => commands::config::execute(&mut ctx, key.as_deref(), value, unset, list)?,
        Commands::Completion { .. } => {}
    }

    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
