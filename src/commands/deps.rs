use crate::cli::args::GlobalFlags;
use crate::commands::runtime::Runtime;
use crate::core::resolver::resolve_dependencies;
use crate::error::Result;
use crate::ui;
use colored::Colorize;

pub fn run(global: &GlobalFlags, packages: &[String], json: bool) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;
    let manager = runtime.manager(global.manager.as_deref())?;

    // The resolver deliberately absorbs per-package failures; report them
    // here when the user asked for detail. The per-instance cache makes
    // the second lookup inside the resolver free.
    if ui::is_verbose() {
        for name in packages {
            if let Err(e) = manager.get_dependencies(name) {
                ui::warning(&format!("lookup failed for '{}': {}", name, e));
            }
        }
    }

    let resolved = resolve_dependencies(manager.as_ref(), packages);

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    if resolved.is_empty() {
        ui::info("no direct dependencies");
        return Ok(());
    }

    ui::header(&format!(
        "Direct dependencies of {} package(s)",
        packages.len()
    ));
    for dep in &resolved {
        let version = dep
            .version
            .as_deref()
            .map(|v| format!(" {}", v.bright_black()))
            .unwrap_or_default();
        let scope = dep
            .scope
            .map(|s| format!(" [{}]", s))
            .unwrap_or_default();
        let optional = if dep.required { "" } else { " (optional)" };
        ui::indent(
            &format!("{}{}{}{}", dep.name.cyan(), version, scope, optional),
            1,
        );
    }
    ui::separator();
    ui::info(&format!("{} unique dependencies", resolved.len()));
    Ok(())
}
