use crate::cli::args::GlobalFlags;
use crate::commands::runtime::{Runtime, split_spec};
use crate::error::{CpakError, Result};
use crate::ui;
use colored::Colorize;

pub fn run(global: &GlobalFlags, packages: &[String]) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;
    let manager = runtime.manager(global.manager.as_deref())?;

    ui::info(&format!(
        "installing {} package(s) via {}",
        packages.len(),
        manager.kind()
    ));

    let mut failed: Vec<&str> = Vec::new();
    for spec in packages {
        if ui::is_interrupted() {
            return Err(CpakError::Interrupted);
        }
        let (name, version) = split_spec(spec);
        let label = match version {
            Some(v) => format!("{} {}", name.cyan(), v.bright_black()),
            None => name.cyan().to_string(),
        };
        if manager.install(name, version)? {
            ui::success(&label);
        } else {
            ui::error(&format!("{} failed", label));
            failed.push(spec);
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CpakError::PackageManagerError(format!(
            "failed to install: {}",
            failed.join(", ")
        )))
    }
}
