use crate::cli::args::GlobalFlags;
use crate::commands::runtime::Runtime;
use crate::core::types::PackageInfo;
use crate::error::Result;
use crate::ui;
use colored::Colorize;

pub fn run(global: &GlobalFlags, query: &str, json: bool) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;
    let manager = runtime.manager(global.manager.as_deref())?;

    let results = manager.search(query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        ui::info(&format!("no packages matching '{}'", query));
        return Ok(());
    }

    ui::header(&format!("Results from {}", manager.kind()));
    for pkg in &results {
        print_result_line(pkg);
    }
    Ok(())
}

fn print_result_line(pkg: &PackageInfo) {
    let version = if pkg.version.is_empty() {
        String::new()
    } else {
        format!(" {}", pkg.version.bright_black())
    };
    let description = pkg
        .description
        .as_deref()
        .map(|d| format!("  {}", d))
        .unwrap_or_default();
    ui::indent(
        &format!("{}{}{}", pkg.name().cyan().bold(), version, description),
        1,
    );
}
