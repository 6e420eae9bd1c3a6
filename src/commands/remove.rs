use crate::cli::args::GlobalFlags;
use crate::commands::runtime::Runtime;
use crate::error::{CpakError, Result};
use crate::ui;
use colored::Colorize;

pub fn run(global: &GlobalFlags, packages: &[String]) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;
    let manager = runtime.manager(global.manager.as_deref())?;

    let mut failed: Vec<&str> = Vec::new();
    for name in packages {
        if ui::is_interrupted() {
            return Err(CpakError::Interrupted);
        }
        // Removing an absent package reports success (idempotent).
        if manager.uninstall(name)? {
            ui::success(&format!("removed {}", name.cyan()));
        } else {
            ui::error(&format!("failed to remove {}", name.cyan()));
            failed.push(name);
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CpakError::PackageManagerError(format!(
            "failed to remove: {}",
            failed.join(", ")
        )))
    }
}
