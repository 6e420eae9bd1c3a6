use crate::error::{CpakError, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// cpak's own configuration directory (~/.config/cpak on Linux).
pub fn config_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("io", "cpak", "cpak")
        .ok_or_else(|| CpakError::Other("Could not determine config directory".into()))?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Default location of the settings file.
pub fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("cpak.kdl"))
}
