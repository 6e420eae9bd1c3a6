//! Command dispatcher
//!
//! Routes CLI commands to their appropriate handlers.

use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::error::Result;

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli) -> Result<()> {
    match &args.command {
        Command::Detect { refresh, json } => commands::detect::run(
            &args.global,
            commands::detect::DetectOptions {
                refresh: *refresh,
                json: *json,
            },
        ),

        Command::Install { packages } => commands::install::run(&args.global, packages),

        Command::Remove { packages } => commands::remove::run(&args.global, packages),

        Command::Update { package } => {
            commands::update::run(&args.global, package.as_deref())
        }

        Command::Search { query, json } => commands::search::run(&args.global, query, *json),

        Command::Info { package, json } => commands::info::run(&args.global, package, *json),

        Command::List { json } => commands::list::run(&args.global, *json),

        Command::Deps { packages, json } => commands::deps::run(&args.global, packages, *json),

        Command::Export { packages, output } => {
            commands::transfer::run_export(&args.global, packages, output)
        }

        Command::Import { source } => commands::transfer::run_import(&args.global, source),

        Command::Doctor => commands::doctor::run(&args.global),

        Command::Completions { shell } => commands::completions::run(*shell),
    }
}
