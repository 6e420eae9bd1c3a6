use crate::config::types::ManagerConfig;
use crate::core::types::{ManagerKind, PackageDependency, PackageInfo, PackageStatus};
use crate::error::{CpakError, Result};
use crate::managers::cache::ResponseCache;
use crate::managers::exec;
use crate::managers::traits::PackageManager;
use crate::ui;
use crate::utils::regex_cache::get_cached_regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// vcpkg adapter (classic mode). Output is line-oriented text; the
/// port list and depend-info formats are parsed below.
pub struct VcpkgManager {
    config: ManagerConfig,
    op_timeout: Duration,
    extra_args: Vec<String>,
    deps_cache: ResponseCache<Vec<PackageDependency>>,
}

/// Export manifest written by `export` and consumed by `import`.
/// vcpkg itself has no import verb, so transfer between hosts goes
/// through this package list instead of a binary tree.
#[derive(Debug, Serialize, Deserialize)]
struct ExportManifest {
    packages: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ManifestEntry {
    name: String,
    version: String,
}

impl VcpkgManager {
    pub fn new(config: ManagerConfig, op_timeout_secs: u64, extra_args: Vec<String>) -> Self {
        Self {
            config,
            op_timeout: Duration::from_secs(op_timeout_secs),
            extra_args,
            deps_cache: ResponseCache::new(),
        }
    }

    fn run_query(&self, args: &[&str]) -> Result<std::process::Output> {
        let mut cmd = exec::build_command(&self.config, args);
        exec::run_with_timeout(&mut cmd, self.op_timeout)
    }

    fn run_mutating(&self, args: &[String]) -> bool {
        let install_root = self
            .config
            .install_dir
            .as_ref()
            .map(|dir| format!("--x-install-root={}", dir.display()));
        let mut full: Vec<&str> = args.iter().map(String::as_str).collect();
        full.extend(self.extra_args.iter().map(String::as_str));
        if let Some(root) = &install_root {
            full.push(root);
        }
        let mut cmd = exec::build_command(&self.config, &full);
        match exec::run_interactive_with_timeout(&mut cmd, self.op_timeout) {
            Ok(status) => status.success(),
            Err(e) => {
                ui::debug(&format!("vcpkg: {}", e));
                false
            }
        }
    }
}

impl PackageManager for VcpkgManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Vcpkg
    }

    fn is_available(&self) -> bool {
        match exec::probe_executable(&self.config, &["version"]) {
            Ok(avail) => {
                if avail == exec::Availability::Unknown {
                    ui::warning("vcpkg probe failed with an unexpected error; treating as unavailable");
                }
                avail.is_available()
            }
            Err(e) => {
                ui::warning(&format!("vcpkg probe: {}", e));
                false
            }
        }
    }

    fn install(&self, name: &str, version: Option<&str>) -> Result<bool> {
        self.deps_cache.invalidate(name);
        if version.is_some() {
            // Classic mode installs whatever the port tree pins; a version
            // request is honored only if it matches, so surface the caveat.
            ui::warning("vcpkg classic mode ignores version pins; installing the port's current version");
        }
        let args = vec!["install".to_string(), name.to_string(), "--recurse".to_string()];
        Ok(self.run_mutating(&args))
    }

    fn uninstall(&self, name: &str) -> Result<bool> {
        self.deps_cache.invalidate(name);
        let args = ["remove", name, "--recurse"];
        let output = match self.run_query(&args) {
            Ok(output) => output,
            Err(e) => {
                ui::debug(&format!("vcpkg remove: {}", e));
                return Ok(false);
            }
        };
        if output.status.success() {
            return Ok(true);
        }
        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        // Removing a port that is not installed counts as success.
        Ok(combined.contains("not installed") || combined.contains("No packages"))
    }

    fn update(&self, name: Option<&str>) -> Result<bool> {
        let mut args = vec!["upgrade".to_string(), "--no-dry-run".to_string()];
        match name {
            Some(name) => {
                self.deps_cache.invalidate(name);
                args.insert(1, name.to_string());
            }
            None => self.deps_cache.clear(),
        }
        Ok(self.run_mutating(&args))
    }

    fn search(&self, query: &str) -> Result<Vec<PackageInfo>> {
        let output = match self.run_query(&["search", query]) {
            Ok(output) if output.status.success() => output,
            _ => return Ok(Vec::new()),
        };
        Ok(parse_port_lines(
            &String::from_utf8_lossy(&output.stdout),
            PackageStatus::NotInstalled,
        ))
    }

    fn info(&self, name: &str) -> Result<Option<PackageInfo>> {
        // Installed tree first, then the port index.
        let installed = self.list_installed()?;
        if let Some(found) = installed.into_iter().find(|p| p.name() == name) {
            return Ok(Some(found));
        }
        let matches = self.search(name)?;
        Ok(matches.into_iter().find(|p| p.name() == name))
    }

    fn list_installed(&self) -> Result<Vec<PackageInfo>> {
        let output = match self.run_query(&["list"]) {
            Ok(output) if output.status.success() => output,
            _ => return Ok(Vec::new()),
        };
        let mut packages = parse_port_lines(
            &String::from_utf8_lossy(&output.stdout),
            PackageStatus::Installed,
        );
        if let Some(dir) = &self.config.install_dir {
            for pkg in &mut packages {
                pkg.install_location = Some(dir.clone());
            }
        }
        Ok(packages)
    }

    fn get_dependencies(&self, name: &str) -> Result<Vec<PackageDependency>> {
        if let Some(cached) = self.deps_cache.get(name) {
            return Ok(cached);
        }
        let output = self.run_query(&["depend-info", name])?;
        if !output.status.success() {
            return Ok(Vec::new());
        }
        // depend-info writes the tree to stderr on some versions; check both.
        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let deps = parse_depend_info(&combined, name)?;
        self.deps_cache.put(name, deps.clone());
        Ok(deps)
    }

    fn export(&self, names: &[String], destination: &Path) -> Result<bool> {
        let installed = self.list_installed()?;
        let mut manifest = ExportManifest { packages: Vec::new() };
        for name in names {
            match installed.iter().find(|p| p.name() == name.as_str()) {
                Some(pkg) => manifest.packages.push(ManifestEntry {
                    name: pkg.name().to_string(),
                    version: pkg.version.clone(),
                }),
                None => {
                    ui::warning(&format!("vcpkg: '{}' is not installed, skipping export", name));
                }
            }
        }
        if manifest.packages.is_empty() {
            return Ok(false);
        }
        let json = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(destination, json).map_err(|e| CpakError::IoError {
            path: destination.to_path_buf(),
            source: e,
        })?;
        Ok(true)
    }

    fn import(&self, source: &Path) -> Result<bool> {
        let content = std::fs::read_to_string(source).map_err(|e| CpakError::IoError {
            path: source.to_path_buf(),
            source: e,
        })?;
        let manifest: ExportManifest = serde_json::from_str(&content)?;
        let mut all_ok = true;
        for entry in manifest.packages {
            all_ok &= self.install(&entry.name, None)?;
        }
        Ok(all_ok)
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
                "vcpkg install root is not writable: {}",
                dir.display()
            ));
            return Ok(false);
        }
        Ok(true)
    }
}

/// Parse `vcpkg list` / `vcpkg search` lines:
/// `zlib:x64-linux    1.3.1    A compression library`.
/// Feature rows (`zlib[shared]:...`) are skipped.
fn parse_port_lines(text: &str, status: PackageStatus) -> Vec<PackageInfo> {
    let mut packages = Vec::new();
    for line in text.lines() {
        let mut cols = line.split_whitespace();
        let Some(first) = cols.next() else { continue };
        if first.contains('[') {
            continue;
        }
        let name = first.split(':').next().unwrap_or(first);
        if name.is_empty() {
            continue;
        }
        // The second column is a version only when it leads with a digit;
        // search output for feature-less ports can omit it.
        let mut version = String::new();
        let mut description = Vec::new();
        if let Some(second) = cols.next() {
            if second.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                version = second.to_string();
            } else {
                description.push(second);
            }
        }
        description.extend(cols);
        if packages
            .iter()
            .any(|p: &PackageInfo| p.name() == name)
        {
            continue;
        }
        let mut info = PackageInfo::new(name, version, status);
        if !description.is_empty() {
            info.description = Some(description.join(" "));
        }
        packages.push(info);
    }
    packages
}

/// Parse `vcpkg depend-info` output and return the direct dependencies
/// of `name`. The relevant line is `name[features]: dep1, dep2, ...`;
/// feature suffixes and triplet tags on dependency names are stripped.
fn parse_depend_info(text: &str, name: &str) -> Result<Vec<PackageDependency>> {
    let line_re = get_cached_regex(r"^([A-Za-z0-9._-]+)(\[[^\]]*\])?:\s*(.*)$")
        .map_err(|e| CpakError::InvalidRegex(e.to_string()))?;

    let mut deps = Vec::new();
    for line in text.lines() {
        let Some(caps) = line_re.captures(line.trim()) else {
            continue;
        };
        if &caps[1] != name {
            continue;
        }
        for raw in caps[3].split(',') {
            let dep = raw
                .trim()
                .split(&['[', ':'][..])
                .next()
                .unwrap_or("")
                .trim();
            if dep.is_empty() || dep == name {
                continue;
            }
            if deps.iter().any(|d: &PackageDependency| d.name == dep) {
                continue;
            }
            deps.push(PackageDependency::new(dep));
        }
        break;
    }
    Ok(deps)
}
