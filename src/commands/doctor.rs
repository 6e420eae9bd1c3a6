use crate::cli::args::GlobalFlags;
use crate::commands::runtime::Runtime;
use crate::error::Result;
use crate::ui;
use colored::Colorize;

/// Validate every configured manager and report what selection would do.
pub fn run(global: &GlobalFlags) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;

    ui::header("Manager health");
    let kinds = runtime.detector.configured_kinds();
    for kind in kinds {
        let manager = runtime.create(kind)?;
        let state = match manager.validate() {
            Ok(true) => "ok".green().to_string(),
            Ok(false) => "unavailable".red().to_string(),
            Err(e) => {
                ui::debug(&format!("{}: {}", kind, e));
                "error".red().to_string()
            }
        };
        ui::indent(&format!("{:<8} {}", kind.to_string().bold(), state), 1);
    }

    let available = runtime.detector.available_kinds()?;
    ui::separator();
    match runtime.selector.select(&available) {
        Some(kind) => ui::success(&format!("would select: {}", kind)),
        None => ui::warning("no supported package manager found"),
    }
    Ok(())
}
