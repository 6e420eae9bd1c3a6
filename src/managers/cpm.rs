use crate::config::types::ManagerConfig;
use crate::core::types::{
    DependencyScope, ManagerKind, PackageDependency, PackageInfo, PackageStatus,
};
use crate::error::Result;
use crate::managers::cache::ResponseCache;
use crate::managers::exec;
use crate::managers::traits::PackageManager;
use crate::ui;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Adapter for cpm, the header-only fetch tool. Every query supports
/// `--json`, so parsing is plain serde deserialization.
pub struct CpmManager {
    config: ManagerConfig,
    op_timeout: Duration,
    extra_args: Vec<String>,
    deps_cache: ResponseCache<Vec<PackageDependency>>,
}

#[derive(Debug, Deserialize)]
struct CpmPackage {
    name: String,
    #[serde(default)]
    version: String,
    description: Option<String>,
    homepage: Option<String>,
    license: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CpmDependency {
    name: String,
    version: Option<String>,
    #[serde(default = "default_true")]
    required: bool,
    scope: Option<String>,
}

fn default_true() -> bool {
    true
}

impl CpmPackage {
    fn into_info(self, status: PackageStatus) -> PackageInfo {
        let mut info = PackageInfo::new(self.name, self.version, status);
        info.description = self.description;
        info.homepage = self.homepage;
        info.license = self.license;
        for dep in self.dependencies {
            info.push_dependency(dep);
        }
        info
    }
}

impl CpmDependency {
    fn into_dependency(self) -> PackageDependency {
        let mut dep = PackageDependency::new(self.name);
        dep.version = self.version;
        dep.required = self.required;
        dep.scope = match self.scope.as_deref() {
            Some("build") => Some(DependencyScope::Build),
            Some("test") => Some(DependencyScope::Test),
            Some("runtime") => Some(DependencyScope::Runtime),
            _ => None,
        };
        dep
    }
}

impl CpmManager {
    pub fn new(config: ManagerConfig, op_timeout_secs: u64, extra_args: Vec<String>) -> Self {
        Self {
            config,
            op_timeout: Duration::from_secs(op_timeout_secs),
            extra_args,
            deps_cache: ResponseCache::new(),
        }
    }

    /// `--dir` points cpm at the configured header tree when set.
    fn dir_arg(&self) -> Option<String> {
        self.config
            .install_dir
            .as_ref()
            .map(|dir| format!("--dir={}", dir.display()))
    }

    fn run_query(&self, args: &[&str]) -> Result<std::process::Output> {
        let dir_arg = self.dir_arg();
        let mut full: Vec<&str> = args.to_vec();
        if let Some(dir) = &dir_arg {
            full.push(dir);
        }
        let mut cmd = exec::build_command(&self.config, &full);
        exec::run_with_timeout(&mut cmd, self.op_timeout)
    }

    fn run_mutating(&self, args: &[String]) -> bool {
        let dir_arg = self.dir_arg();
        let mut full: Vec<&str> = args.iter().map(String::as_str).collect();
        if let Some(dir) = &dir_arg {
            full.push(dir);
        }
        full.extend(self.extra_args.iter().map(String::as_str));
        let mut cmd = exec::build_command(&self.config, &full);
        match exec::run_interactive_with_timeout(&mut cmd, self.op_timeout) {
            Ok(status) => status.success(),
            Err(e) => {
                ui::debug(&format!("cpm: {}", e));
                false
            }
        }
    }
}

impl PackageManager for CpmManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Cpm
    }

    fn is_available(&self) -> bool {
        match exec::probe_executable(&self.config, &["--version"]) {
            Ok(avail) => {
                if avail == exec::Availability::Unknown {
                    ui::warning("cpm probe failed with an unexpected error; treating as unavailable");
                }
                avail.is_available()
            }
            Err(e) => {
                ui::warning(&format!("cpm probe: {}", e));
                false
            }
        }
    }

    fn install(&self, name: &str, version: Option<&str>) -> Result<bool> {
        self.deps_cache.invalidate(name);
        let spec = match version {
            Some(v) => format!("{}@{}", name, v),
            None => name.to_string(),
        };
        Ok(self.run_mutating(&["add".to_string(), spec]))
    }

    fn uninstall(&self, name: &str) -> Result<bool> {
        self.deps_cache.invalidate(name);
        let output = match self.run_query(&["rm", name]) {
            Ok(output) => output,
            Err(e) => {
                ui::debug(&format!("cpm rm: {}", e));
                return Ok(false);
            }
        };
        if output.status.success() {
            return Ok(true);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        // Removing a package that was never fetched is success.
        Ok(stderr.contains("not installed") || stderr.contains("not found"))
    }

    fn update(&self, name: Option<&str>) -> Result<bool> {
        let mut args = vec!["up".to_string()];
        match name {
            Some(name) => {
                self.deps_cache.invalidate(name);
                args.push(name.to_string());
            }
            None => self.deps_cache.clear(),
        }
        Ok(self.run_mutating(&args))
    }

    fn search(&self, query: &str) -> Result<Vec<PackageInfo>> {
        let output = match self.run_query(&["search", query, "--json"]) {
            Ok(output) if output.status.success() => output,
            _ => return Ok(Vec::new()),
        };
        let packages: Vec<CpmPackage> =
            serde_json::from_slice(&output.stdout).unwrap_or_default();
        Ok(packages
            .into_iter()
            .map(|p| p.into_info(PackageStatus::NotInstalled))
            .collect())
    }

    fn info(&self, name: &str) -> Result<Option<PackageInfo>> {
        let output = match self.run_query(&["info", name, "--json"]) {
            Ok(output) if output.status.success() => output,
            _ => return Ok(None),
        };
        let package: Option<CpmPackage> = serde_json::from_slice(&output.stdout).ok();
        Ok(package.map(|p| {
            let mut info = p.into_info(PackageStatus::Installed);
            info.install_location = self.config.install_dir.clone();
            info
        }))
    }

    fn list_installed(&self) -> Result<Vec<PackageInfo>> {
        let output = match self.run_query(&["ls", "--json"]) {
            Ok(output) if output.status.success() => output,
            _ => return Ok(Vec::new()),
        };
        let packages: Vec<CpmPackage> =
            serde_json::from_slice(&output.stdout).unwrap_or_default();
        Ok(packages
            .into_iter()
            .map(|p| p.into_info(PackageStatus::Installed))
            .collect())
    }

    fn get_dependencies(&self, name: &str) -> Result<Vec<PackageDependency>> {
        if let Some(cached) = self.deps_cache.get(name) {
            return Ok(cached);
        }
        let output = self.run_query(&["deps", name, "--json"])?;
        if !output.status.success() {
            return Ok(Vec::new());
        }
        let raw: Vec<CpmDependency> = serde_json::from_slice(&output.stdout).unwrap_or_default();
        let deps: Vec<PackageDependency> =
            raw.into_iter().map(CpmDependency::into_dependency).collect();
        self.deps_cache.put(name, deps.clone());
        Ok(deps)
    }

    fn export(&self, names: &[String], destination: &Path) -> Result<bool> {
        let mut args = vec!["export".to_string()];
        args.extend(names.iter().cloned());
        args.push(format!("--out={}", destination.display()));
        Ok(self.run_mutating(&args))
    }

    fn import(&self, source: &Path) -> Result<bool> {
        Ok(self.run_mutating(&["import".to_string(), source.display().to_string()]))
    }

    fn validate(&self) -> Result<bool> {
        if !self.is_available() {
            return Ok(false);
        }
        if let Some(dir) = &self.config.install_dir
            && !dir.exists()
            && std::fs::create_dir_all(dir).is_err()
        {
            ui::warning(&format!(
                "cpm header directory is not writable: {}",
                dir.display()
            ));
            return Ok(false);
        }
        Ok(true)
    }
}
