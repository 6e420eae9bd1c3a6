use crate::cli::args::GlobalFlags;
use crate::commands::runtime::Runtime;
use crate::error::{CpakError, Result};
use crate::ui;
use std::path::Path;

pub fn run_export(global: &GlobalFlags, packages: &[String], output: &Path) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;
    let manager = runtime.manager(global.manager.as_deref())?;

    if manager.export(packages, output)? {
        ui::success(&format!(
            "exported {} package(s) to {}",
            packages.len(),
            output.display()
        ));
        Ok(())
    } else {
        Err(CpakError::PackageManagerError("export failed".to_string()))
    }
}

pub fn run_import(global: &GlobalFlags, source: &Path) -> Result<()> {
    let mut runtime = Runtime::from_flags(global)?;
    let manager = runtime.manager(global.manager.as_deref())?;

    if manager.import(source)? {
        ui::success(&format!("imported packages from {}", source.display()));
        Ok(())
    } else {
        Err(CpakError::PackageManagerError("import failed".to_string()))
    }
}
