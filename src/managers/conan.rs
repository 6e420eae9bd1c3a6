use crate::config::types::ManagerConfig;
use crate::core::types::{
    DependencyScope, ManagerKind, PackageDependency, PackageInfo, PackageStatus,
};
use crate::error::Result;
use crate::managers::cache::ResponseCache;
use crate::managers::exec;
use crate::managers::traits::PackageManager;
use crate::ui;
use std::path::Path;
use std::time::Duration;

/// Conan 2.x adapter. All structured queries go through `--format=json`;
/// recipe references are `name/version` strings throughout.
pub struct ConanManager {
    config: ManagerConfig,
    op_timeout: Duration,
    extra_args: Vec<String>,
    deps_cache: ResponseCache<Vec<PackageDependency>>,
}

impl ConanManager {
    pub fn new(mut config: ManagerConfig, op_timeout_secs: u64, extra_args: Vec<String>) -> Self {
        // CONAN_HOME follows the configured config_dir unless the user
        // already pinned it via an env override.
        if let Some(dir) = config.config_dir.clone() {
            config
                .env
                .entry("CONAN_HOME".to_string())
                .or_insert_with(|| dir.display().to_string());
        }
        Self {
            config,
            op_timeout: Duration::from_secs(op_timeout_secs),
            extra_args,
            deps_cache: ResponseCache::new(),
        }
    }

    fn reference(name: &str, version: Option<&str>) -> String {
        match version {
            Some(v) => format!("{}/{}", name, v),
            None => format!("{}/[*]", name),
        }
    }

    fn run_query(&self, args: &[&str]) -> Result<std::process::Output> {
        let mut cmd = exec::build_command(&self.config, args);
        exec::run_with_timeout(&mut cmd, self.op_timeout)
    }

    /// Mutating call: stream the tool's own output, absorb non-zero exit
    /// and timeout into a boolean.
    fn run_mutating(&self, args: &[String]) -> bool {
        let arg_refs: Vec<&str> = args
            .iter()
            .chain(self.extra_args.iter())
            .map(String::as_str)
            .collect();
        let mut cmd = exec::build_command(&self.config, &arg_refs);
        match exec::run_interactive_with_timeout(&mut cmd, self.op_timeout) {
            Ok(status) => status.success(),
            Err(e) => {
                ui::debug(&format!("conan: {}", e));
                false
            }
        }
    }
}

impl PackageManager for ConanManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Conan
    }

    fn is_available(&self) -> bool {
        match exec::probe_executable(&self.config, &["--version"]) {
            Ok(avail) => {
                if avail == exec::Availability::Unknown {
                    ui::warning("conan probe failed with an unexpected error; treating as unavailable");
                }
                avail.is_available()
            }
            Err(e) => {
                ui::warning(&format!("conan probe: {}", e));
                false
            }
        }
    }

    fn install(&self, name: &str, version: Option<&str>) -> Result<bool> {
        self.deps_cache.invalidate(name);
        let args = vec![
            "install".to_string(),
            format!("--requires={}", Self::reference(name, version)),
            "--build=missing".to_string(),
        ];
        Ok(self.run_mutating(&args))
    }

    fn uninstall(&self, name: &str) -> Result<bool> {
        self.deps_cache.invalidate(name);
        let pattern = format!("{}/*", name);
        let args = ["remove", pattern.as_str(), "--confirm"];
        let output = match self.run_query(&args) {
            Ok(output) => output,
            Err(e) => {
                ui::debug(&format!("conan remove: {}", e));
                return Ok(false);
            }
        };
        if output.status.success() {
            return Ok(true);
        }
        // Removing a recipe that was never installed is success, not failure.
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(stderr.contains("not found") || stderr.contains("No recipes matching"))
    }

    fn update(&self, name: Option<&str>) -> Result<bool> {
        match name {
            Some(name) => {
                self.deps_cache.invalidate(name);
                let args = vec![
                    "install".to_string(),
                    format!("--requires={}", Self::reference(name, None)),
                    "--update".to_string(),
                    "--build=missing".to_string(),
                ];
                Ok(self.run_mutating(&args))
            }
            None => {
                // Conan has no single update-all verb; refresh every cached
                // recipe in turn and report the aggregate outcome.
                self.deps_cache.clear();
                let installed = self.list_installed()?;
                let mut all_ok = true;
                for pkg in installed {
                    let args = vec![
                        "install".to_string(),
                        format!("--requires={}", Self::reference(pkg.name(), None)),
                        "--update".to_string(),
                        "--build=missing".to_string(),
                    ];
                    all_ok &= self.run_mutating(&args);
                }
                Ok(all_ok)
            }
        }
    }

    fn search(&self, query: &str) -> Result<Vec<PackageInfo>> {
        let output = match self.run_query(&["search", query, "--format=json"]) {
            Ok(output) if output.status.success() => output,
            _ => return Ok(Vec::new()),
        };
        let refs = parse_ref_listing(&String::from_utf8_lossy(&output.stdout));
        Ok(refs
            .into_iter()
            .map(|(name, version)| PackageInfo::new(name, version, PackageStatus::NotInstalled))
            .collect())
    }

    fn info(&self, name: &str) -> Result<Option<PackageInfo>> {
        let pattern = format!("{}/*", name);
        let output = match self.run_query(&["list", pattern.as_str(), "--format=json"]) {
            Ok(output) if output.status.success() => output,
            _ => return Ok(None),
        };
        let refs = parse_ref_listing(&String::from_utf8_lossy(&output.stdout));
        let found = refs.into_iter().find(|(n, _)| n == name);
        Ok(found.map(|(n, version)| {
            let mut info = PackageInfo::new(n, version, PackageStatus::Installed);
            info.install_location = self.config.cache_dir.clone();
            info
        }))
    }

    fn list_installed(&self) -> Result<Vec<PackageInfo>> {
        let output = match self.run_query(&["list", "*", "--format=json"]) {
            Ok(output) if output.status.success() => output,
            _ => return Ok(Vec::new()),
        };
        let refs = parse_ref_listing(&String::from_utf8_lossy(&output.stdout));
        Ok(refs
            .into_iter()
            .map(|(name, version)| PackageInfo::new(name, version, PackageStatus::Installed))
            .collect())
    }

    fn get_dependencies(&self, name: &str) -> Result<Vec<PackageDependency>> {
        if let Some(cached) = self.deps_cache.get(name) {
            return Ok(cached);
        }
        let requires = format!("--requires={}", Self::reference(name, None));
        let output = self.run_query(&["graph", "info", requires.as_str(), "--format=json"])?;
        if !output.status.success() {
            // Recipe unknown to every remote: no dependencies, not an error.
            return Ok(Vec::new());
        }
        let deps = parse_graph_dependencies(&String::from_utf8_lossy(&output.stdout), name);
        self.deps_cache.put(name, deps.clone());
        Ok(deps)
    }

    fn export(&self, names: &[String], destination: &Path) -> Result<bool> {
        let mut args = vec![
            "cache".to_string(),
            "save".to_string(),
            format!("--file={}", destination.display()),
        ];
        args.extend(names.iter().map(|n| format!("{}/*", n)));
        Ok(self.run_mutating(&args))
    }

    fn import(&self, source: &Path) -> Result<bool> {
        let args = vec![
            "cache".to_string(),
            "restore".to_string(),
            source.display().to_string(),
        ];
        Ok(self.run_mutating(&args))
    }

    fn validate(&self) -> Result<bool> {
        if !self.is_available() {
            return Ok(false);
        }
        // Beyond the probe: the cache directory must be usable when configured.
        if let Some(dir) = &self.config.cache_dir
            && !dir.exists()
            && std::fs::create_dir_all(dir).is_err()
        {
            ui::warning(&format!("conan cache directory is not writable: {}", dir.display()));
            return Ok(false);
        }
        Ok(true)
    }
}

/// Split a `name/version` recipe reference. Revision/user suffixes
/// (`#rev`, `@user/channel`) are dropped.
fn parse_ref(reference: &str) -> Option<(String, String)> {
    let trimmed = reference
        .split('#')
        .next()
        .unwrap_or(reference)
        .split('@')
        .next()
        .unwrap_or(reference);
    let (name, version) = trimmed.split_once('/')?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), version.to_string()))
}

/// Parse `conan list`/`conan search` JSON: an object of sources
/// ("Local Cache", remote names) whose values map recipe references to
/// detail objects. References are deduplicated across sources.
fn parse_ref_listing(json: &str) -> Vec<(String, String)> {
    let doc: serde_json::Value = match serde_json::from_str(json) {
        Ok(doc) => doc,
        Err(_) => return Vec::new(),
    };
    let mut refs = Vec::new();
    let Some(sources) = doc.as_object() else {
        return refs;
    };
    for listing in sources.values() {
        let Some(entries) = listing.as_object() else {
            continue;
        };
        for reference in entries.keys() {
            if let Some(parsed) = parse_ref(reference)
                && !refs.contains(&parsed)
            {
                refs.push(parsed);
            }
        }
    }
    refs
}

/// Parse `conan graph info --format=json`: find the node for `name` and
/// collect its direct dependency edges.
fn parse_graph_dependencies(json: &str, name: &str) -> Vec<PackageDependency> {
    let doc: serde_json::Value = match serde_json::from_str(json) {
        Ok(doc) => doc,
        Err(_) => return Vec::new(),
    };
    let prefix = format!("{}/", name);
    let Some(nodes) = doc
        .pointer("/graph/nodes")
        .and_then(serde_json::Value::as_object)
    else {
        return Vec::new();
    };

    let package_node = nodes.values().find(|node| {
        node.get("ref")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|r| r.starts_with(&prefix))
    });
    let Some(edges) = package_node
        .and_then(|node| node.get("dependencies"))
        .and_then(serde_json::Value::as_object)
    else {
        return Vec::new();
    };

    let mut deps = Vec::new();
    for edge in edges.values() {
        let direct = edge
            .get("direct")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true);
        if !direct {
            continue;
        }
        let Some((dep_name, dep_version)) = edge
            .get("ref")
            .and_then(serde_json::Value::as_str)
            .and_then(parse_ref)
        else {
            continue;
        };
        let flag = |key: &str| {
            edge.get(key)
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
        };
        let scope = if flag("build") {
            DependencyScope::Build
        } else if flag("test") {
            DependencyScope::Test
        } else {
            DependencyScope::Runtime
        };
        let mut dep = PackageDependency::new(dep_name)
            .with_version(dep_version)
            .with_scope(scope);
        if flag("optional") {
            dep = dep.optional();
        }
        deps.push(dep);
    }
    deps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_parsing_strips_revision_and_user() {
        assert_eq!(
            parse_ref("zlib/1.3.1#abcd"),
            Some(("zlib".to_string(), "1.3.1".to_string()))
        );
        assert_eq!(
            parse_ref("fmt/10.1.1@user/stable"),
            Some(("fmt".to_string(), "10.1.1".to_string()))
        );
        assert_eq!(parse_ref("no-slash"), None);
    }

    #[test]
    fn ref_listing_walks_all_sources() {
        let json = r#"{
            "Local Cache": { "zlib/1.3.1": {}, "fmt/10.1.1": {} },
            "conancenter": { "zlib/1.3.1": {}, "boost/1.84.0": {} }
        }"#;
        let refs = parse_ref_listing(json);
        assert_eq!(refs.len(), 3);
        assert!(refs.contains(&("boost".to_string(), "1.84.0".to_string())));
    }

    #[test]
    fn ref_listing_tolerates_garbage() {
        assert!(parse_ref_listing("not json").is_empty());
        assert!(parse_ref_listing("[1, 2, 3]").is_empty());
    }

    #[test]
    fn graph_dependencies_take_direct_edges_of_the_named_node() {
        let json = r#"{
            "graph": { "nodes": {
                "0": { "ref": "cli", "dependencies": { "1": { "ref": "openssl/3.2.0", "direct": true } } },
                "1": {
                    "ref": "openssl/3.2.0#rev1",
                    "dependencies": {
                        "2": { "ref": "zlib/1.3.1", "direct": true, "build": false },
                        "3": { "ref": "cmake/3.28.1", "direct": true, "build": true },
                        "4": { "ref": "indirect/1.0", "direct": false }
                    }
                }
            }}
        }"#;
        let deps = parse_graph_dependencies(json, "openssl");
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].name, "zlib");
        assert_eq!(deps[0].scope, Some(DependencyScope::Runtime));
        assert_eq!(deps[1].name, "cmake");
        assert_eq!(deps[1].scope, Some(DependencyScope::Build));
        assert!(deps.iter().all(|d| d.required));
    }

    #[test]
    fn graph_dependencies_empty_when_node_missing() {
        let json = r#"{ "graph": { "nodes": {} } }"#;
        assert!(parse_graph_dependencies(json, "zlib").is_empty());
    }
}
