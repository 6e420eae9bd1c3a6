use crate::cli::args::GlobalFlags;
use crate::commands::runtime::Runtime;
use crate::core::types::PackageStatus;
use crate::error::{CpakError, Result};
use crate::ui;

pub fn run(global: &GlobalFlags, package: &str, json: bool) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;
    let manager = runtime.manager(global.manager.as_deref())?;

    let Some(info) = manager.info(package)? else {
        return Err(CpakError::TargetNotFound(package.to_string()));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    ui::header(info.name());
    if !info.version.is_empty() {
        ui::keyval("Version", &info.version);
    }
    ui::keyval(
        "Status",
        match info.status {
            PackageStatus::Installed => "installed",
            PackageStatus::NotInstalled => "not installed",
            PackageStatus::Outdated => "outdated",
            PackageStatus::Error => "error",
        },
    );
    if let Some(description) = &info.description {
        ui::keyval("Description", description);
    }
    if let Some(homepage) = &info.homepage {
        ui::keyval("Homepage", homepage);
    }
    if let Some(license) = &info.license {
        ui::keyval("License", license);
    }
    if !info.dependencies.is_empty() {
        ui::keyval("Depends on", &info.dependencies.join(", "));
    }
    if let Some(location) = &info.install_location {
        ui::keyval("Location", &location.display().to_string());
    }
    Ok(())
}
