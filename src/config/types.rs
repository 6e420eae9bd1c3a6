use crate::core::types::ManagerKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Hard timeout for availability probes, in seconds.
pub const PROBE_TIMEOUT_SECS: u64 = 10;

/// Default timeout for mutating operations (install/remove/update), in seconds.
pub const OPERATION_TIMEOUT_SECS: u64 = 300;

/// Upper bound a user may raise the operation timeout to.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Configuration for talking to one package manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Which manager this block describes.
    pub kind: ManagerKind,

    /// Binary name or absolute path (e.g. "conan", "/opt/vcpkg/vcpkg").
    /// Empty string means "not configured"; the probe reports that as a
    /// configuration error rather than crashing.
    pub executable: String,

    /// Manager-specific configuration directory (e.g. CONAN_HOME).
    pub config_dir: Option<PathBuf>,

    /// Download/build cache directory.
    pub cache_dir: Option<PathBuf>,

    /// Where installed packages land (vcpkg installed tree, cpm include dir).
    pub install_dir: Option<PathBuf>,

    /// Environment overrides merged into every child process. Keys unique.
    pub env: HashMap<String, String>,
}

impl ManagerConfig {
    /// Config for a kind with its conventional executable name.
    pub fn for_kind(kind: ManagerKind) -> Self {
        Self {
            kind,
            executable: kind.default_executable().to_string(),
            config_dir: None,
            cache_dir: None,
            install_dir: None,
            env: HashMap::new(),
        }
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }
}

/// Whole-file settings: backend priority plus one config block per manager.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Selection priority, highest first. Defaults to conan > vcpkg > cpm.
    pub priority: Vec<ManagerKind>,
    pub managers: HashMap<ManagerKind, ManagerConfig>,
    /// Override for mutating-operation timeout, clamped to MAX_TIMEOUT_SECS.
    pub operation_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let mut managers = HashMap::new();
        for kind in ManagerKind::all() {
            managers.insert(kind, ManagerConfig::for_kind(kind));
        }
        Self {
            priority: ManagerKind::all().to_vec(),
            managers,
            operation_timeout_secs: OPERATION_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Config for one kind, falling back to the conventional defaults.
    pub fn manager_config(&self, kind: ManagerKind) -> ManagerConfig {
        self.managers
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| ManagerConfig::for_kind(kind))
    }

    /// Configs for every concrete kind, in default-priority order.
    pub fn all_manager_configs(&self) -> Vec<ManagerConfig> {
        ManagerKind::all()
            .into_iter()
            .map(|kind| self.manager_config(kind))
            .collect()
    }
}
