use crate::cli::args::GlobalFlags;
use crate::commands::runtime::Runtime;
use crate::error::Result;
use crate::ui;
use colored::Colorize;

pub struct DetectOptions {
    pub refresh: bool,
    pub json: bool,
}

pub fn run(global: &GlobalFlags, options: DetectOptions) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;

    let entries = if options.refresh {
        runtime.detector.refresh()?
    } else {
        runtime.detector.detect()?
    };

    if options.json {
        let rows: Vec<serde_json::Value> = entries
            .iter()
            .map(|(kind, entry)| {
                serde_json::json!({
                    "manager": kind.to_string(),
                    "available": entry.available,
                    "checked_at": entry.checked_at.to_rfc3339(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    ui::header("Package managers");
    for (kind, entry) in entries {
        let mark = if entry.available {
            "available".green().to_string()
        } else {
            "unavailable".red().to_string()
        };
        ui::indent(
            &format!(
                "{:<8} {:<14} probed {}",
                kind.to_string().bold(),
                mark,
                entry.checked_at.format("%H:%M:%S")
            ),
            1,
        );
    }

    let available = runtime.detector.available_kinds()?;
    match runtime.selector.select(&available) {
        Some(kind) => ui::success(&format!("selected: {}", kind)),
        None => ui::warning("no supported package manager found"),
    }
    Ok(())
}
