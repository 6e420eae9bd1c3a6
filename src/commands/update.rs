use crate::cli::args::GlobalFlags;
use crate::commands::runtime::Runtime;
use crate::error::{CpakError, Result};
use crate::ui;

pub fn run(global: &GlobalFlags, package: Option<&str>) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;
    let manager = runtime.manager(global.manager.as_deref())?;

    match package {
        Some(name) => ui::info(&format!("updating {} via {}", name, manager.kind())),
        None => ui::info(&format!("updating all packages via {}", manager.kind())),
    }

    if manager.update(package)? {
        ui::success("update complete");
        Ok(())
    } else {
        Err(CpakError::PackageManagerError("update failed".to_string()))
    }
}
