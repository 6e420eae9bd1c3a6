use crate::cli::args::GlobalFlags;
use crate::commands::runtime::Runtime;
use crate::error::Result;
use crate::ui;
use colored::Colorize;

pub fn run(global: &GlobalFlags, json: bool) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;
    let manager = runtime.manager(global.manager.as_deref())?;

    let installed = manager.list_installed()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&installed)?);
        return Ok(());
    }

    if installed.is_empty() {
        ui::info(&format!("no packages installed via {}", manager.kind()));
        return Ok(());
    }

    ui::header(&format!("Installed via {}", manager.kind()));
    for pkg in &installed {
        let version = if pkg.version.is_empty() {
            "?".to_string()
        } else {
            pkg.version.clone()
        };
        ui::indent(
            &format!("{} {}", pkg.name().cyan(), version.bright_black()),
            1,
        );
    }
    ui::separator();
    ui::info(&format!("{} package(s)", installed.len()));
    Ok(())
}
