use crate::config::types::ManagerConfig;
use crate::core::types::ManagerKind;
use crate::error::{CpakError, Result};
use crate::managers::conan::ConanManager;
use crate::managers::cpm::CpmManager;
use crate::managers::traits::PackageManager;
use crate::managers::vcpkg::VcpkgManager;

/// Maps a config to a concrete manager instance. Each concrete kind has
/// exactly one constructor; `Unknown` fails closed: a silently wrong
/// manager is worse than a visible configuration error. No I/O happens
/// here; availability belongs to the instance's own `validate()`.
pub struct ManagerFactory;

impl ManagerFactory {
    pub fn create(
        config: &ManagerConfig,
        op_timeout_secs: u64,
        extra_args: Vec<String>,
    ) -> Result<Box<dyn PackageManager>> {
        if config.executable.is_empty() {
            return Err(CpakError::ConfigError(format!(
                "No executable configured for manager '{}'",
                config.kind
            )));
        }
        match config.kind {
            ManagerKind::Conan => Ok(Box::new(ConanManager::new(
                config.clone(),
                op_timeout_secs,
                extra_args,
            ))),
            ManagerKind::Vcpkg => Ok(Box::new(VcpkgManager::new(
                config.clone(),
                op_timeout_secs,
                extra_args,
            ))),
            ManagerKind::Cpm => Ok(Box::new(CpmManager::new(
                config.clone(),
                op_timeout_secs,
                extra_args,
            ))),
            ManagerKind::Unknown => {
                Err(CpakError::UnsupportedBackend(config.kind.to_string()))
            }
        }
    }
}
